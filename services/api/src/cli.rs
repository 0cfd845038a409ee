use crate::commands::{
    run_audit, run_export, run_form, run_rank, AuditArgs, ExportArgs, FormArgs, RankArgs,
};
use crate::server;
use admissions::error::AppError;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Admission Desk",
    about = "Rank, export and audit polytechnic admission applications",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Print the merit ranking for a category
    Rank(RankArgs),
    /// Write the ranking sheet for a category as CSV
    Export(ExportArgs),
    /// Write the printable admission form for one application
    Form(FormArgs),
    /// Check generated application ids for duplicates and gaps
    Audit(AuditArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Serve applications from this JSON fixture instead of the configured store
    #[arg(long)]
    pub(crate) fixture: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Rank(args) => run_rank(args).await,
        Command::Export(args) => run_export(args).await,
        Command::Form(args) => run_form(args).await,
        Command::Audit(args) => run_audit(args).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use admissions::applications::{AdmissionCategory, CategoryFilter};
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn rank_parses_category_filter() {
        let cli = Cli::try_parse_from([
            "admission-desk",
            "rank",
            "--category",
            "management_quota_regular",
            "--fixture",
            "demos/applications.json",
        ])
        .expect("parses");

        match cli.command {
            Some(Command::Rank(args)) => {
                assert_eq!(
                    args.category,
                    CategoryFilter::Only(AdmissionCategory::ManagementQuotaRegular)
                );
                assert_eq!(args.fixture, Some(PathBuf::from("demos/applications.json")));
            }
            other => panic!("expected rank command, got {other:?}"),
        }
    }

    #[test]
    fn export_rejects_unknown_category() {
        let result = Cli::try_parse_from(["admission-desk", "export", "--category", "sports"]);
        assert!(result.is_err());
    }

    #[test]
    fn no_subcommand_means_serve() {
        let cli = Cli::try_parse_from(["admission-desk"]).expect("parses");
        assert!(cli.command.is_none());
    }
}
