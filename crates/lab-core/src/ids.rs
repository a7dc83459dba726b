//! ID prefix constants.
//!
//! Every entity ID has the form `<prefix>-<8 hex chars>`, e.g. `res-a3f8b2c1`.

pub const PREFIX_RESEARCH: &str = "res";
pub const PREFIX_CITATION: &str = "cit";
pub const PREFIX_DOWNLOAD: &str = "dwn";
pub const PREFIX_SURVEY: &str = "srv";
pub const PREFIX_FORM: &str = "frm";
pub const PREFIX_QUESTION: &str = "qst";
pub const PREFIX_CHOICE: &str = "chc";
pub const PREFIX_REVIEW: &str = "rev";
pub const PREFIX_AUDIT: &str = "aud";

/// All prefixes, for exhaustive ID tests.
pub const ALL_PREFIXES: &[&str] = &[
    PREFIX_RESEARCH,
    PREFIX_CITATION,
    PREFIX_DOWNLOAD,
    PREFIX_SURVEY,
    PREFIX_FORM,
    PREFIX_QUESTION,
    PREFIX_CHOICE,
    PREFIX_REVIEW,
    PREFIX_AUDIT,
];
