//! CLI argument parsing via `clap`.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "plotaudit",
    version,
    about = "Audit plot specifications for visual-design defects",
    long_about = "plotaudit checks declarative plot bundles for inaccessible colors, misleading scales, unreadable text, missing redundant encoding, and unclear labels.\n\nConfiguration precedence: CLI > plotaudit.toml > defaults.",
    after_help = "Examples:\n  plotaudit audit plots/*.plot.json\n  plotaudit audit --checks color,scales --output json\n  plotaudit fix plots/sales.plot.json --auto --write\n  plotaudit simulate plots/sales.plot.json --type deutan\n  plotaudit colors red '#00BA38' --type protan",
    arg_required_else_help = true
)]
/// Top-level CLI options and subcommands.
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand)]
/// Supported subcommands.
pub enum Commands {
    /// Show version
    #[command(about = "Show version", long_about = "Print the current plotaudit version.")]
    Version,
    /// Audit plot bundles
    #[command(
        about = "Audit plot bundles",
        long_about = "Run the selected checks over every bundle matched by the patterns. Exits 1 when any bundle has issues, 2 on input errors.",
        after_help = "Examples:\n  plotaudit audit\n  plotaudit audit plots/a.plot.json --checks labels --output json"
    )]
    Audit {
        #[arg(help = "Bundle paths or glob patterns (default: from config or **/*.plot.*)")]
        patterns: Vec<String>,
        #[arg(long, help = "Checks to run: all or a comma list of color,scales,text,accessibility,labels")]
        checks: Option<String>,
        #[arg(long, help = "Output mode: human|json (default: human)")]
        output: Option<String>,
        #[arg(long, help = "Project root (default: current dir)")]
        repo_root: Option<String>,
    },
    /// Suggest or apply fixes
    #[command(
        about = "Suggest fixes",
        long_about = "Print corrective snippets for every finding. With --auto the mechanical fixes are applied to a copy of each bundle; --write saves it in place.",
        after_help = "Examples:\n  plotaudit fix plots/a.plot.json\n  plotaudit fix --auto --write"
    )]
    Fix {
        #[arg(help = "Bundle paths or glob patterns")]
        patterns: Vec<String>,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Apply mechanical fixes to the specification")]
        auto: bool,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Write revised bundles back (implies --auto)")]
        write: bool,
        #[arg(long, help = "Output mode: human|json (default: human)")]
        output: Option<String>,
        #[arg(long, help = "Project root (default: current dir)")]
        repo_root: Option<String>,
    },
    /// Simulate color-vision deficiency over a bundle
    #[command(
        about = "Simulate CVD on a bundle",
        long_about = "Rewrite every color of the bundle's specification as seen under the given deficiency and print the revised bundle."
    )]
    Simulate {
        #[arg(help = "Bundle file")]
        file: String,
        #[arg(long = "type", default_value = "deutan", help = "deutan|protan|tritan")]
        kind: String,
        #[arg(long, help = "Write the simulated bundle to this path instead of stdout")]
        write: Option<String>,
    },
    /// Simulate color-vision deficiency over a list of colors
    #[command(
        about = "Simulate CVD on colors",
        long_about = "Parse each color and show how it appears under the given deficiency."
    )]
    Colors {
        #[arg(required = true, help = "Colors: names, #RGB, #RRGGBB or greyN")]
        colors: Vec<String>,
        #[arg(long = "type", default_value = "deutan", help = "deutan|protan|tritan")]
        kind: String,
        #[arg(long, default_value_t = 1.0, help = "Severity between 0 and 1")]
        severity: f64,
        #[arg(long, help = "Output mode: human|json (default: human)")]
        output: Option<String>,
    },
}
