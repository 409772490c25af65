pub(crate) mod grading;
pub(crate) mod report;
pub(crate) mod tracks;
