use clap::{App, Arg};
use env_logger;
use log::error;
use photodraw::album::Library;
use photodraw::googlephotos::api::GPhotosApi;
use photodraw::kvstore::FileStore;
use photodraw::oauth::store::TokenStore;
use photodraw::oauth::{self, AuthConfig, TokenService};
use photodraw::paging::Pages;
use std::io;

fn run(config_path: &str, state_dir: &str) -> Result<(), failure::Error> {
    let auth_config = AuthConfig::from_client_file(config_path)?;
    let tokens = TokenService::new(auth_config, TokenStore::open(FileStore::new(state_dir))?)?;
    oauth::authorize_interactive(&tokens, io::stdin().lock())?;

    let gapi = GPhotosApi::new(tokens);
    println!("Albums:");
    for page in Pages::new(|token: Option<&str>| gapi.list_albums(token)) {
        for album in page? {
            println!(
                "* {} - {} ({} items)",
                if album.title.is_empty() {
                    "NO TITLE"
                } else {
                    album.title.as_str()
                },
                album.id,
                album.media_items_count
            );
        }
    }

    println!("Pass one of the above titles to photodraw with --album");
    Ok(())
}

fn main() {
    env_logger::init();

    let matches = App::new("Photo Draw album list")
        .version("0.1")
        .arg(
            Arg::with_name("config")
                .long("config")
                .env("CONFIG")
                .required(true)
                .takes_value(true)
                .help("Path to the OAuth client file downloaded from Google API console"),
        )
        .arg(
            Arg::with_name("state_dir")
                .long("state-dir")
                .takes_value(true)
                .default_value(".")
                .help("Directory keeping the OAuth token"),
        )
        .get_matches();

    let config_path = matches.value_of("config").unwrap_or_default();
    let state_dir = matches.value_of("state_dir").unwrap_or(".");
    if let Err(e) = run(config_path, state_dir) {
        error!("Failed to list albums: {}", e);
        std::process::exit(1);
    }
}
