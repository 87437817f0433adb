use clap::Parser;

use topiq::Args;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = Args::parse();

	topiq::run(args).await
}
