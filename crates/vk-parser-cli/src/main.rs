use anyhow::Context;
use clap::Parser;
use colored::Colorize;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use vk_parser::{
    CachedVideoParser, MemoryCacheStore, Outcome, Session, VkVideoParser, default_client,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Owner id of the video (the part before '_' in vk.com/video urls)
    owner_id: String,

    /// Video id (the part after '_')
    video_id: String,

    /// Cookie string of an authenticated session ("name=value; ...").
    /// Needed only for age-restricted content.
    #[clap(long, env = "VK_COOKIES")]
    cookies: Option<String>,

    /// Skip the result cache for this lookup
    #[clap(long)]
    no_cache: bool,

    /// Cache TTL in seconds (entries never expire when omitted)
    #[clap(long)]
    ttl: Option<u64>,

    /// Output the result in JSON format
    #[clap(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let session = args.cookies.as_deref().map(Session::from_cookie_string);

    let parser = CachedVideoParser::new(
        Arc::new(VkVideoParser::new(default_client())),
        Some(Arc::new(MemoryCacheStore::new())),
    );
    let outcome = parser
        .get_source_list_cached(
            &args.owner_id,
            &args.video_id,
            session.as_ref(),
            !args.no_cache,
            args.ttl,
        )
        .await
        .with_context(|| format!("failed to look up video {}_{}", args.owner_id, args.video_id))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    match outcome {
        Outcome::Denied => {
            println!("{}", "Video is private, removed or blocked.".red().bold());
        }
        Outcome::Unsupported => {
            println!(
                "{}",
                "Page reachable, but no playable source was found.".yellow().bold()
            );
        }
        Outcome::Found(sources) => {
            println!("{}", "Sources:".green().bold());
            for (quality, url) in &sources.static_sources {
                println!("  {}: {}", quality.to_string().yellow(), url.blue());
            }
            if let Some(embed) = &sources.embed {
                println!("  {}: {}", "embed".yellow(), embed.blue());
            }
            if let Some(stream) = &sources.stream {
                println!("  {}: {}", "stream".yellow(), stream.blue());
            }
        }
    }

    Ok(())
}
