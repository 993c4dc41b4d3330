//! detail types carried by each [`Error`](crate::Error) variant

use derive_more::{Display, From};

#[derive(Display, Debug)]
#[display(fmt = "{what}: {reason}")]
pub struct InvalidInput {
    what: String,
    reason: String,
}

impl InvalidInput {
    pub(crate) fn new<T: Into<String>, U: Into<String>>(what: T, reason: U) -> Self {
        Self {
            what: what.into(),
            reason: reason.into(),
        }
    }

    /// the parameter that was rejected
    pub fn what(&self) -> &str {
        &self.what
    }
}

#[derive(Display, Debug)]
#[display(fmt = "`{snapshot}`: {reason}")]
pub struct SnapshotLoad {
    snapshot: String,
    reason: String,
}

impl SnapshotLoad {
    pub(crate) fn new<T: ToString, U: Into<String>>(snapshot: T, reason: U) -> Self {
        Self {
            snapshot: snapshot.to_string(),
            reason: reason.into(),
        }
    }
}

#[derive(Display, Debug)]
#[display(fmt = "{message}")]
pub struct Precondition {
    message: String,
}

impl Precondition {
    pub(crate) fn new<T: Into<String>>(message: T) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[derive(Display, Debug)]
#[display(fmt = "axis `{axis}` has {found} samples, {required} are required")]
pub struct InsufficientSamples {
    pub axis: char,
    pub found: usize,
    pub required: usize,
}

#[derive(Display, Debug)]
#[display(fmt = "cannot normalize a field whose maximum is {max}")]
pub struct DegenerateField {
    pub max: f32,
}

#[derive(Display, Debug)]
#[display(fmt = "`{path}`: {failure}")]
pub struct Emit {
    path: String,
    failure: EmitFailure,
}

impl Emit {
    pub(crate) fn new<T: Into<EmitFailure>>(path: &std::path::Path, failure: T) -> Self {
        Self {
            path: path.display().to_string(),
            failure: failure.into(),
        }
    }

    pub fn failure(&self) -> &EmitFailure {
        &self.failure
    }
}

#[derive(From, Display, Debug)]
pub enum EmitFailure {
    #[display(fmt = "io error: {_0}")]
    Io(std::io::Error),
    #[display(fmt = "json encoding failed: {_0}")]
    Json(serde_json::Error),
    #[display(fmt = "xml encoding failed: {_0}")]
    Xml(quick_xml::Error),
    #[display(fmt = "the container was already flushed")]
    #[from(ignore)]
    AlreadyFlushed,
    #[display(fmt = "no mesh record was stored before flushing")]
    #[from(ignore)]
    Empty,
    #[display(fmt = "a mesh record named `{_0}` was already stored")]
    #[from(ignore)]
    DuplicateRecord(String),
    #[display(fmt = "mesh record `{_0}` does not share the grid of the records before it")]
    #[from(ignore)]
    GridMismatch(String),
}

#[derive(Display, Debug)]
#[display(fmt = "`{path}`: {reason}")]
pub struct ContainerRead {
    path: String,
    reason: String,
}

impl ContainerRead {
    pub(crate) fn new<T: Into<String>>(path: &std::path::Path, reason: T) -> Self {
        Self {
            path: path.display().to_string(),
            reason: reason.into(),
        }
    }
}
