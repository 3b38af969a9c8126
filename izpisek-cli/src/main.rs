use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use izpisek_core::{
    apply_categories, assign_category, dedupe_by_id, monthly_summary, totals, CategoryStore,
    JsonFileStore, Transaction, CATEGORIES_FILE, MERCHANT_CATEGORIES_FILE,
};
use izpisek_ingest::{parse_bks_si_text, parse_bks_si_text_with_stats, PlainTextFile, TextSource};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "izpisek", version, about = "BKS statement extraction CLI")]
struct Cli {
    /// Id-keyed category file
    #[arg(long, global = true, default_value = CATEGORIES_FILE)]
    categories: PathBuf,

    /// Merchant-keyed category file
    #[arg(long, global = true, default_value = MERCHANT_CATEGORIES_FILE)]
    merchant_categories: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse one extracted-text statement and print its transactions
    Parse {
        /// Statement dump (.txt) produced by the PDF extraction step
        file: PathBuf,

        /// Also print rejected-line diagnostics
        #[arg(long)]
        stats: bool,
    },

    /// Combine every statement in a directory into a monthly summary
    Summary {
        /// Directory of statement dumps
        dir: PathBuf,
    },

    /// Persist a category for a transaction id (and its merchant key)
    Categorize {
        /// Transaction id as printed by `parse`
        id: String,

        /// Category to record
        category: String,

        /// Description used to derive the merchant key for auto-matching
        #[arg(long)]
        description: Option<String>,
    },

    /// Print stored id-to-category assignments
    Categories,

    /// Export combined transactions from a directory as CSV
    Export {
        /// Directory of statement dumps
        dir: PathBuf,

        /// Output CSV path
        #[arg(long)]
        out: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let id_store = JsonFileStore::new(&cli.categories);
    let merchant_store = JsonFileStore::new(&cli.merchant_categories);

    match cli.command {
        Command::Parse { file, stats } => cmd_parse(&file, stats, &id_store, &merchant_store),
        Command::Summary { dir } => cmd_summary(&dir, &id_store, &merchant_store),
        Command::Categorize {
            id,
            category,
            description,
        } => {
            assign_category(
                &id_store,
                &merchant_store,
                &id,
                &category,
                description.as_deref(),
            )?;
            println!("Recorded category {category:?} for {id}");
            Ok(())
        }
        Command::Categories => cmd_categories(&id_store),
        Command::Export { dir, out } => cmd_export(&dir, &out, &id_store, &merchant_store),
    }
}

fn cmd_parse(
    file: &Path,
    show_stats: bool,
    id_store: &JsonFileStore,
    merchant_store: &JsonFileStore,
) -> Result<()> {
    let text = PlainTextFile::new(file)
        .document_text()
        .with_context(|| format!("extracting {}", file.display()))?;
    let (mut txns, stats) = parse_bks_si_text_with_stats(&text)?;
    apply_categories(&mut txns, &id_store.load()?, &merchant_store.load()?);

    for t in &txns {
        print_txn(t);
    }
    let sums = totals(&txns);
    println!(
        "\n{} transactions | expenses {:.2} | income {:.2}",
        txns.len(),
        sums.expenses,
        sums.income
    );
    if show_stats {
        println!(
            "scanned {} lines, rejected {} date-anchored lines",
            stats.lines, stats.rejected_anchors
        );
    }
    Ok(())
}

fn cmd_summary(dir: &Path, id_store: &JsonFileStore, merchant_store: &JsonFileStore) -> Result<()> {
    let (mut txns, statements) = collect_transactions(dir)?;
    apply_categories(&mut txns, &id_store.load()?, &merchant_store.load()?);

    for m in monthly_summary(&txns) {
        println!(
            "{:<16} income {:>9.2} | expenses {:>9.2}",
            m.month, m.income, m.expenses
        );
    }
    let sums = totals(&txns);
    println!(
        "\n{} statements, {} transactions | expenses {:.2} | income {:.2}",
        statements,
        txns.len(),
        sums.expenses,
        sums.income
    );
    Ok(())
}

fn cmd_categories(id_store: &JsonFileStore) -> Result<()> {
    let map = id_store.load()?;
    let mut entries: Vec<_> = map.into_iter().collect();
    entries.sort();
    for (id, category) in entries {
        println!("{id}  {category}");
    }
    Ok(())
}

fn cmd_export(
    dir: &Path,
    out: &Path,
    id_store: &JsonFileStore,
    merchant_store: &JsonFileStore,
) -> Result<()> {
    let (mut txns, _) = collect_transactions(dir)?;
    apply_categories(&mut txns, &id_store.load()?, &merchant_store.load()?);

    let mut wtr =
        csv::Writer::from_path(out).with_context(|| format!("creating {}", out.display()))?;
    wtr.write_record([
        "id",
        "date",
        "account",
        "payer_payee",
        "description",
        "debit",
        "credit",
        "balance",
        "type",
        "amount",
        "category",
    ])?;
    for t in &txns {
        wtr.write_record(&[
            t.id.clone(),
            t.date.format("%d.%m.%Y").to_string(),
            t.account.clone(),
            t.payer_payee.clone(),
            t.description.clone(),
            format!("{:.2}", t.debit),
            format!("{:.2}", t.credit),
            format!("{:.2}", t.balance),
            t.kind.as_str().to_string(),
            format!("{:.2}", t.amount),
            t.category.clone().unwrap_or_default(),
        ])?;
    }
    wtr.flush()?;
    println!("Wrote {} transactions to {}", txns.len(), out.display());
    Ok(())
}

/// Parse every supported statement dump in `dir`, combined and deduped,
/// newest first. A file that fails to extract or parse is reported and
/// skipped; one bad dump should not sink the whole scan.
fn collect_transactions(dir: &Path) -> Result<(Vec<Transaction>, usize)> {
    let entries = fs::read_dir(dir).with_context(|| format!("reading {}", dir.display()))?;
    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| PlainTextFile::is_supported(p))
        .collect();
    paths.sort();

    let mut all = Vec::new();
    let mut statements = 0;
    for path in &paths {
        let text = match PlainTextFile::new(path).document_text() {
            Ok(text) => text,
            Err(err) => {
                eprintln!("skipping {}: {err}", path.display());
                continue;
            }
        };
        match parse_bks_si_text(&text) {
            Ok(txns) => {
                statements += 1;
                all.extend(txns);
            }
            Err(err) => eprintln!("skipping {}: {err}", path.display()),
        }
    }

    let mut combined = dedupe_by_id(all);
    combined.sort_by(|a, b| b.date.cmp(&a.date));
    Ok((combined, statements))
}

fn print_txn(t: &Transaction) {
    let sign = if t.is_income() { '+' } else { '-' };
    println!(
        "{} {}{:>8.2} bal {:>9.2} | {} | {} | {} | {}",
        t.date.format("%d.%m.%Y"),
        sign,
        t.amount,
        t.balance,
        t.payer_payee,
        t.description,
        t.category.as_deref().unwrap_or("-"),
        t.id,
    );
}
