mod add;
mod update;

pub use add::AddCommands;
pub use update::UpdateCommands;
