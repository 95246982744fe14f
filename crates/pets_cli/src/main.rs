//! Catalog command-line entry point.
//!
//! # Responsibility
//! - Act as a thin presentation layer over `pets_core::PetProvider`.
//! - Render the catalog dump and report provider errors as exit status 1.

use clap::{Parser, Subcommand};
use log::info;
use pets_core::{init_logging, Gender, Pet, PetProvider, PetValues, PetsConfig, ProviderError};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "pets_cli")]
#[command(about = "Inspect and edit the pets catalog", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print every row of the catalog (default)
    Dump,
    /// Insert the demo pet Toto
    InsertDummy,
    /// Delete rows at a `pets` or `pets/{id}` address
    Delete { path: String },
    /// Print the content type of an address
    Type { path: String },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = PetsConfig::from_env();
    if let Some(log_dir) = config.log_dir.as_deref() {
        if let Err(err) = init_logging(&config.log_level, log_dir) {
            eprintln!("logging disabled: {err}");
        }
    }

    match run(&config, cli.command.unwrap_or(Command::Dump)) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &PetsConfig, command: Command) -> Result<String, ProviderError> {
    let provider = PetProvider::open(&config.db_path)?;
    info!(
        "event=cli_open module=cli status=ok db_path={}",
        config.db_path.display()
    );

    let output = match command {
        Command::Dump => render_catalog(&provider.query("pets", None, None)?),
        Command::InsertDummy => {
            let id = provider.insert("pets", &dummy_pet())?;
            format!("inserted pets/{id}")
        }
        Command::Delete { path } => {
            let removed = provider.delete(&path, None)?;
            format!("deleted {removed} pets")
        }
        Command::Type { path } => provider.type_of(&path)?.content_type().to_string(),
    };

    provider.close()?;
    Ok(output)
}

fn dummy_pet() -> PetValues {
    PetValues::new()
        .name("Toto")
        .breed(Some("Terrier"))
        .gender(Gender::Male)
        .weight(Some(7))
}

fn render_catalog(pets: &[Pet]) -> String {
    let mut out = format!(
        "The pets table contains {} pets.\n\n_id - name - breed - gender - weight\n",
        pets.len()
    );
    for pet in pets {
        out.push_str(&format!(
            "\n{} - {} - {} - {} - {}",
            pet.id,
            pet.name,
            pet.breed.as_deref().unwrap_or(""),
            pet.gender.code(),
            pet.weight.map(|weight| weight.to_string()).unwrap_or_default()
        ));
    }
    out
}
