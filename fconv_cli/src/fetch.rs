use bytes::Bytes;
use fconv_core::{Config, Error, Source};
use fconv_fetch_http::HttpFetcher;
use fconv_fetch_local::LocalFetcher;
use tracing::debug;

/// Reads the raw input document named by the config.
///
/// Only URL inputs look at the timeout, so a bad `--timeout` is ignored for
/// files and standard input.
pub async fn fetch_content(config: &Config) -> Result<Bytes, Error> {
    let source = config.source();
    debug!(%source, "fetching input");
    match source {
        Source::Stdin => LocalFetcher::Stdin
            .fetch()
            .await
            .map_err(|err| Error::fetch_failed(source, err)),
        Source::File(path) => LocalFetcher::File(path.clone())
            .fetch()
            .await
            .map_err(|err| Error::fetch_failed(source, err)),
        Source::Url(url) => {
            let timeout = config.http_timeout()?;
            let fetcher = HttpFetcher::create(timeout).map_err(|err| Error::fetch_failed(url, err))?;
            fetcher
                .fetch(url)
                .await
                .map_err(|err| Error::fetch_failed(url, err))
        }
    }
}
