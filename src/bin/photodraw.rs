use clap::{App, Arg, ArgMatches};
use env_logger;
use failure::{Error, Fail};
use log::error;
use photodraw::cache::AlbumCache;
use photodraw::downloader::Downloader;
use photodraw::error::Error as DrawError;
use photodraw::googlephotos::api::GPhotosApi;
use photodraw::kvstore::FileStore;
use photodraw::oauth::store::TokenStore;
use photodraw::oauth::{self, AuthConfig, TokenService};
use photodraw::selector::RandomSelector;
use photodraw::{Config, PhotoDraw, DOWNLOAD_COUNT};
use std::io;
use std::str::FromStr;

#[derive(Debug, Fail)]
#[fail(display = "Invalid argument {} - {}", name, reason)]
struct InvalidArgError {
    name: &'static str,
    reason: String,
}

type Result<T> = std::result::Result<T, Error>;

fn parse_value<T>(matches: &ArgMatches, name: &'static str) -> Result<Option<T>>
where
    T: FromStr,
    <T as FromStr>::Err: std::fmt::Display,
{
    if let Some(val) = matches.value_of(name) {
        return match val.parse::<T>() {
            Ok(v) => Ok(Some(v)),
            Err(e) => Err(InvalidArgError {
                name,
                reason: e.to_string(),
            }
            .into()),
        };
    }
    Ok(None)
}

fn required<'a>(matches: &'a ArgMatches, name: &'static str) -> Result<&'a str> {
    matches
        .value_of(name)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| DrawError::ConfigMissing(name).into())
}

fn create_config(matches: &ArgMatches) -> Result<Config> {
    let mut config = Config::new(required(matches, "album")?);
    if let Some(count) = parse_value(matches, "count")? {
        config.downloads = count;
    }
    config.refresh = matches.is_present("refresh");
    Ok(config)
}

fn create_api(matches: &ArgMatches, store: &FileStore) -> Result<GPhotosApi> {
    let auth_config = AuthConfig::from_client_file(required(matches, "config")?)
        .map_err(DrawError::Credential)?;
    let token_store = TokenStore::open(store.clone())
        .map_err(|e| DrawError::Credential(oauth::Error::from(e)))?;
    let tokens = TokenService::new(auth_config, token_store).map_err(DrawError::Credential)?;

    oauth::authorize_interactive(&tokens, io::stdin().lock()).map_err(DrawError::Credential)?;
    Ok(GPhotosApi::new(tokens))
}

fn run(matches: ArgMatches<'_>) -> Result<()> {
    let config = create_config(&matches)?;
    let store = FileStore::new(matches.value_of("state_dir").unwrap_or("."));
    let output_dir = matches.value_of("output_dir").unwrap_or(".");

    let api = create_api(&matches, &store)?;
    let app = PhotoDraw::new(
        config,
        &api,
        Downloader::new(&api, output_dir),
        AlbumCache::new(store),
        RandomSelector::from_entropy(),
    );
    app.run()?;
    Ok(())
}

fn main() {
    env_logger::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let count = DOWNLOAD_COUNT.to_string();
    let matches = App::new("Photo Draw")
        .version("0.1")
        .about("Download random photos from a Google Photos album")
        .arg(
            Arg::with_name("config")
                .long("config")
                .env("CONFIG")
                .takes_value(true)
                .help("Path to the OAuth client file downloaded from Google API console"),
        )
        .arg(
            Arg::with_name("album")
                .long("album")
                .env("ALBUM")
                .takes_value(true)
                .help("Title of the album to draw photos from"),
        )
        .arg(
            Arg::with_name("output_dir")
                .long("output-dir")
                .env("OUTPUT_DIR")
                .takes_value(true)
                .default_value(".")
                .help("Existing directory to save downloaded photos into"),
        )
        .arg(
            Arg::with_name("state_dir")
                .long("state-dir")
                .takes_value(true)
                .default_value(".")
                .help("Directory keeping the OAuth token and album cache"),
        )
        .arg(
            Arg::with_name("count")
                .long("count")
                .takes_value(true)
                .default_value(&count)
                .help("Number of photos to download"),
        )
        .arg(
            Arg::with_name("refresh")
                .long("refresh")
                .help("Fetch the album listing again instead of using the cached one"),
        )
        .get_matches();

    if let Err(e) = run(matches) {
        if let Some(e) = e.downcast_ref::<InvalidArgError>() {
            eprintln!("Invalid argument {} - {}", e.name, e.reason);
        } else {
            error!("Error happened, shutting down: {}", e);
        }
        std::process::exit(1);
    }
}
