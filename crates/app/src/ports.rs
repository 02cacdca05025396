//! Port definitions — traits that adapters implement.
//!
//! Ports are the boundaries between the control core and the hardware,
//! network and host it drives. They are defined here (in `app`) so that both
//! the service layer and the adapter layer can depend on them without
//! creating circular dependencies.

pub mod amplifier;
pub mod clock;
pub mod digital_output;
pub mod home_assistant;
pub mod shell;

pub use amplifier::AmplifierDriver;
pub use clock::{Clock, TokioClock};
pub use digital_output::DigitalOutput;
pub use home_assistant::HomeAssistantPublisher;
pub use shell::{POWEROFF_COMMAND, Shell};
