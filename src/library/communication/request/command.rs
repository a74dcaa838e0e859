use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Debug;

/// Instruction dispatched to a service behind the bus, answered with exactly one reply
///
/// Implementations tie a serializable payload shape to the deserializable
/// shape of the expected reply. The reply payload is validated against
/// [`Command::Reply`] at decode time instead of being poked at through
/// untyped map lookups.
///
/// Commands may not have side effects on the requesting side: failures are
/// reported, never retried, so a lost reply must be inconsequential.
pub trait Command: Serialize + Send + Sync {
    /// Expected reply payload type
    type Reply: DeserializeOwned + Debug + Send;

    /// Wire name of the command, carried in the `cmd` envelope field
    const NAME: &'static str;

    /// Subject on which the command is published
    fn subject() -> &'static str;
}
