//! One module per subcommand. Handlers take the resolved store and output
//! streams and return `CliError` on failure.

mod cards;
mod doctor;
mod seed;
mod selection;

pub use cards::{handle_card_command, handle_list_command};
pub use doctor::handle_doctor_command;
pub use seed::handle_seed_command;
pub use selection::{handle_daily_command, handle_draw_command, handle_yesno_command};
