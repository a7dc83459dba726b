pub mod audit;
pub mod collaborator;
pub mod dashboard;
pub mod decide;
pub mod dispatch;
pub mod histogram;
pub mod metrics;
pub mod rank;
pub mod research;
pub mod review;
pub mod shared;
pub mod survey;
pub mod trend;
