//! Prompt command - show the instruction a set of output options selects.

use clap::Args;
use console::style;

use likh_core::OutputFlags;

/// Arguments for the prompt command.
#[derive(Args)]
pub struct PromptArgs {
    /// Format output as CSV
    #[arg(long)]
    csv: bool,

    /// Treat the image as a structured bill/invoice (only with --csv)
    #[arg(long)]
    structured: bool,
}

pub fn run(args: PromptArgs) -> anyhow::Result<()> {
    let flags = OutputFlags::new(args.csv, args.structured);

    if args.structured && !args.csv {
        eprintln!(
            "{} --structured only applies together with --csv; ignoring it.",
            style("ℹ").blue()
        );
    }

    println!("{}", flags.prompt());

    Ok(())
}
