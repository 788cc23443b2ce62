mod intake;

pub use intake::{handle_intake_action, handle_intake_message, start_intake};
