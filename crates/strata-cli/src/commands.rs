use std::path::Path;
use std::sync::Arc;

use colored::Colorize;
use futures::StreamExt;
use tokio::io::AsyncWriteExt;

use strata_pipeline::Pipeline;
use strata_server::{ServerConfig, StrataServer};
use strata_store::{
    BackendBlockStore, BlockStore, FsBlobBackend, MemoryBlockStore, TieredBlockStore,
};

use crate::cli::{AddArgs, CatArgs, Cli, Command, ServeArgs};

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Serve(args) => cmd_serve(args).await,
        Command::Add(args) => cmd_add(args).await,
        Command::Cat(args) => cmd_cat(args).await,
    }
}

async fn cmd_serve(args: ServeArgs) -> anyhow::Result<()> {
    let mut config = match &args.config {
        Some(path) => ServerConfig::load(path)?,
        None => ServerConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    if let Some(root) = args.data_root {
        config.data_root = root;
    }
    StrataServer::new(config).serve().await?;
    Ok(())
}

async fn cmd_add(args: AddArgs) -> anyhow::Result<()> {
    let pipeline = local_pipeline(&args.data_root)?;
    let data = tokio::fs::read(&args.file).await?;
    let name = args
        .file
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload");
    let outcome = pipeline.add_bytes(name, &data).await?;

    println!("{} added {}", "✓".green().bold(), outcome.path.bold());
    println!("  hash: {}", outcome.hash.yellow());
    println!("  size: {} bytes", outcome.size);
    Ok(())
}

async fn cmd_cat(args: CatArgs) -> anyhow::Result<()> {
    let pipeline = local_pipeline(&args.data_root)?;
    let mut stream = pipeline.cat(&args.cid).await?;

    match args.output {
        Some(path) => {
            let mut file = tokio::fs::File::create(&path).await?;
            while let Some(chunk) = stream.next().await {
                file.write_all(&chunk?).await?;
            }
            file.flush().await?;
            println!("{} wrote {}", "✓".green().bold(), path.display());
        }
        None => {
            let mut stdout = tokio::io::stdout();
            while let Some(chunk) = stream.next().await {
                stdout.write_all(&chunk?).await?;
            }
            stdout.flush().await?;
        }
    }
    Ok(())
}

/// Wire the same storage stack the server uses, against a local directory.
fn local_pipeline(data_root: &Path) -> anyhow::Result<Pipeline> {
    let backend = FsBlobBackend::open(data_root)?;
    let cache = Arc::new(MemoryBlockStore::new());
    let durable = Arc::new(BackendBlockStore::new(backend));
    let store = TieredBlockStore::new(
        cache as Arc<dyn BlockStore>,
        durable as Arc<dyn BlockStore>,
    );
    Ok(Pipeline::new(Arc::new(store) as Arc<dyn BlockStore>))
}
