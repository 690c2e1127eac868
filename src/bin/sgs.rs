use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use sgs::{Client, Codes, DateRange, Language, storage};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "sgs",
    version,
    about = "Fetch, align & search Brazilian Central Bank (SGS) time series"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch one or more series as a date-aligned table.
    Get(GetArgs),
    /// Show metadata of a series.
    Meta(MetaArgs),
    /// Search series by keyword.
    Search(SearchArgs),
}

#[derive(ValueEnum, Clone, Debug)]
enum OutFormat {
    Csv,
    Json,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Lang {
    Pt,
    En,
}

impl From<Lang> for Language {
    fn from(l: Lang) -> Self {
        match l {
            Lang::Pt => Language::Pt,
            Lang::En => Language::En,
        }
    }
}

#[derive(Args, Debug)]
struct GetArgs {
    /// Series codes separated by comma or semicolon (e.g., 12,433)
    #[arg(short, long)]
    codes: String,
    /// Column names, one per code (e.g., cdi,ipca). Defaults to the codes.
    #[arg(short, long)]
    names: Option<String>,
    /// First date, inclusive (YYYY-MM-DD)
    #[arg(short, long)]
    start: Option<String>,
    /// Last date, inclusive (YYYY-MM-DD)
    #[arg(short, long)]
    end: Option<String>,
    /// Save results to file instead of printing CSV to stdout.
    #[arg(long)]
    out: Option<PathBuf>,
    /// Output format (csv or json). If omitted, inferred from --out extension.
    #[arg(long, value_enum)]
    format: Option<OutFormat>,
}

#[derive(Args, Debug)]
struct MetaArgs {
    /// Series code (e.g., 12)
    code: u32,
    #[arg(long, value_enum, default_value_t = Lang::Pt)]
    lang: Lang,
}

#[derive(Args, Debug)]
struct SearchArgs {
    /// Keyword to look for in series names (e.g., cdi)
    keyword: String,
    #[arg(long, value_enum, default_value_t = Lang::Pt)]
    lang: Lang,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Get(args) => cmd_get(args),
        Command::Meta(args) => cmd_meta(args),
        Command::Search(args) => cmd_search(args),
    }
}

fn cmd_get(args: GetArgs) -> Result<()> {
    let codes = Codes::parse_list(&args.codes, args.names.as_deref())?;
    let range = DateRange::parse(args.start.as_deref(), args.end.as_deref())?;
    let client = Client::new()?;
    let table = client
        .dataframe_range(codes, range)
        .with_context(|| format!("fetching series {}", args.codes))?;

    let Some(path) = args.out.as_ref() else {
        return match args.format {
            Some(OutFormat::Json) => {
                println!("{}", serde_json::to_string_pretty(&table.to_records())?);
                Ok(())
            }
            _ => storage::write_csv(&table, std::io::stdout().lock()),
        };
    };

    let fmt = match args.format {
        Some(OutFormat::Csv) => "csv",
        Some(OutFormat::Json) => "json",
        None => path.extension().and_then(|e| e.to_str()).unwrap_or("csv"),
    }
    .to_ascii_lowercase();
    match fmt.as_str() {
        "csv" => storage::save_csv(&table, path)?,
        "json" => storage::save_json(&table, path)?,
        other => anyhow::bail!("unsupported format: {}", other),
    }
    eprintln!("Saved {} rows to {}", table.len(), path.display());
    Ok(())
}

fn cmd_meta(args: MetaArgs) -> Result<()> {
    let meta = Client::new()?
        .metadata_in(args.code, args.lang.into())
        .with_context(|| format!("metadata for series {}", args.code))?;
    println!("{}", serde_json::to_string_pretty(&meta)?);
    Ok(())
}

fn cmd_search(args: SearchArgs) -> Result<()> {
    let found = Client::new()?
        .search_in(args.keyword.as_str(), args.lang.into())
        .with_context(|| format!("searching for '{}'", args.keyword))?;
    println!("{}", serde_json::to_string_pretty(&found)?);
    eprintln!("{} series found", found.len());
    Ok(())
}
