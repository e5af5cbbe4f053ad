use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;
	let args = tape_api::Args::parse();
	tape_api::run(args).await
}
