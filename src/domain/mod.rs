//! Commands understood by the core services behind the bus
//!
//! Each command ties its outbound payload shape to the shape of the expected
//! reply, both of which end up in the `payload` field of the respective
//! envelope. All core commands are published on the shared ingress subject.

use crate::constants::SUBJECT_CORE_INGRESS;
use crate::library::communication::request::Command;
use serde::{Deserialize, Serialize};

/// Greeting request handled by the core
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Hello {
    /// Text the core should include in its greeting
    pub out: String,
}

/// Reply to a [`Hello`] command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelloReply {
    /// Rendered greeting
    pub text: String,
}

impl Command for Hello {
    type Reply = HelloReply;
    const NAME: &'static str = "hello";

    fn subject() -> &'static str {
        SUBJECT_CORE_INGRESS
    }
}

/// Identity request handled by the core
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Iam {}

/// Reply to an [`Iam`] command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IamReply {
    /// Name the responding core identifies itself with
    pub name: String,
}

impl Command for Iam {
    type Reply = IamReply;
    const NAME: &'static str = "iam";

    fn subject() -> &'static str {
        SUBJECT_CORE_INGRESS
    }
}
