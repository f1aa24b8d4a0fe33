use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = mm_cli::Args::parse();

	mm_api::run(args).await
}
