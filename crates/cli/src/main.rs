use std::path::PathBuf;

use anyhow::{Context, Result, bail};

use figtree_core::SceneDocument;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 {
        eprintln!("Usage: figtree pages <file>");
        eprintln!("       figtree convert <file> [page-id]");
        std::process::exit(1);
    }

    let command = args[1].as_str();
    let path = PathBuf::from(&args[2]);
    let data = std::fs::read(&path).with_context(|| format!("reading {}", path.display()))?;
    let document = SceneDocument::decode(&data).context("decoding scene container")?;

    match command {
        "pages" => {
            for page in document.pages() {
                println!("{}\t{}\t{} children", page.id, page.name, page.child_count);
            }
        }
        "convert" => {
            let conversion = match args.get(3) {
                Some(page_id) => document.convert_page(page_id)?,
                None => document.convert_all()?,
            };
            for warning in &conversion.warnings {
                eprintln!("warning: {warning}");
            }
            println!("{}", serde_json::to_string_pretty(&conversion)?);
        }
        other => bail!("unknown command `{other}`"),
    }
    Ok(())
}
