/// Errors raised by the signature contract (`spec.md` §4.2).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PqSigError {
    /// The scheme is stateful: signing twice at the same epoch (or at an
    /// epoch at or before the last used one) risks a forgeable key and is
    /// refused outright (`spec.md` §9, "Stateful signatures").
    EpochAlreadyUsed { requested: u32, last_used: u32 },
    /// `epoch` falls outside `[activation_epoch, activation_epoch + num_active_epochs)`.
    EpochOutOfRange {
        epoch: u32,
        activation_epoch: u32,
        num_active_epochs: u32,
    },
}

impl std::fmt::Display for PqSigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PqSigError::EpochAlreadyUsed {
                requested,
                last_used,
            } => write!(
                f,
                "refusing to sign at epoch {requested}: last used epoch was {last_used}"
            ),
            PqSigError::EpochOutOfRange {
                epoch,
                activation_epoch,
                num_active_epochs,
            } => write!(
                f,
                "epoch {epoch} outside active range [{activation_epoch}, {})",
                activation_epoch + num_active_epochs
            ),
        }
    }
}

impl std::error::Error for PqSigError {}
