use clap::ValueEnum;

/// How a command's result is printed.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON.
    #[default]
    Json,
    /// Aligned columns for a terminal.
    Table,
    /// One-line JSON, for piping.
    Raw,
}

/// Flags shared by every `datalink` subcommand.
#[derive(Clone, Debug, Default)]
pub struct GlobalFlags {
    pub format: OutputFormat,
    /// Cap on rows printed by list-style commands.
    pub limit: Option<u32>,
    pub quiet: bool,
    pub verbose: bool,
    /// Overrides `database.url` from config and environment.
    pub database: Option<String>,
}

impl GlobalFlags {
    /// `--limit` as a row count, if given.
    pub fn row_limit(&self) -> Option<usize> {
        self.limit.and_then(|limit| usize::try_from(limit).ok())
    }

    pub fn is_table(&self) -> bool {
        self.format == OutputFormat::Table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_json_without_limit() {
        let flags = GlobalFlags::default();
        assert_eq!(flags.format, OutputFormat::Json);
        assert_eq!(flags.row_limit(), None);
        assert!(!flags.is_table());
    }

    #[test]
    fn row_limit_converts() {
        let flags = GlobalFlags {
            limit: Some(5),
            ..GlobalFlags::default()
        };
        assert_eq!(flags.row_limit(), Some(5));
    }
}
