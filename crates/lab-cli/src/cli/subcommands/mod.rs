mod collaborator;
mod research;
mod review;
mod survey;
mod trend;

pub use collaborator::CollaboratorCommands;
pub use research::ResearchCommands;
pub use review::ReviewCommands;
pub use survey::SurveyCommands;
pub use trend::TrendCommands;
