use crate::core::errors::{Error, Result};
use crate::core::service_tags::ServiceTags;
use lazy_static::lazy_static;
use log::{info, warn};
use regex::Regex;
use reqwest::header::USER_AGENT;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::{thread, time};

/*-------------------------------------------------------------------------------------------------
  Defaults
-------------------------------------------------------------------------------------------------*/

/// Microsoft download-confirmation page that links to the current Azure IP Ranges and Service
/// Tags (Public Cloud) JSON file.
pub const DEFAULT_URL: &str = "https://www.microsoft.com/en-us/download/confirmation.aspx?id=56519";

/// User-Agent header sent with the landing-page request.
pub const DEFAULT_USER_AGENT: &str = "My-user-agent";

/// Pattern locating the Service Tags download link in the landing page. Capture group 1 is the
/// download URL (the `href=` and opening quote are not part of it).
pub const DEFAULT_DOWNLOAD_URL_PATTERN: &str =
    r#"href=['"](https://download\.microsoft\.com/download.+\.json)"#;

lazy_static! {
    static ref DEFAULT_DOWNLOAD_URL_REGEX: Regex =
        Regex::new(DEFAULT_DOWNLOAD_URL_PATTERN).expect("default download URL pattern is valid");
}

/*-------------------------------------------------------------------------------------------------
  Simple Interface
-------------------------------------------------------------------------------------------------*/

/// _**Simple library interface**_ that locates, retrieves, and parses the Azure Service Tags
/// using the default client configuration (plus any `AZUREIPRANGES_*` environment variables).
///
/// ```no_run
/// let service_tags = azureipranges::get_service_tags().unwrap();
///
/// let filter = azureipranges::Filter::new(["northeurope"], ["PowerBI"]);
/// let report = azureipranges::SubnetReport::build(&service_tags, &filter).unwrap();
/// println!("{report}");
/// ```
pub fn get_service_tags() -> Result<Box<ServiceTags>> {
    Client::new().get_service_tags()
}

/*-------------------------------------------------------------------------------------------------
  Source
-------------------------------------------------------------------------------------------------*/

/// Where the Service Tags JSON is loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// Locate the download link on this landing page, then download the JSON.
    Remote(String),

    /// Read the JSON from this local file.
    Local(PathBuf),
}

/*-------------------------------------------------------------------------------------------------
  Client Builder
-------------------------------------------------------------------------------------------------*/

/// A builder for the [Client] struct that allows you to customize the client configuration.
///
/// ```
/// let client = azureipranges::ClientBuilder::new()
///     .url("https://www.microsoft.com/en-us/download/confirmation.aspx?id=56519")
///     .user_agent("My-user-agent")
///     .request_timeout(30_000) // 30 seconds
///     .retry_count(2)
///     .build();
/// ```
///
/// The [ClientBuilder::new] method attempts to source configuration values from environment
/// variables when set and uses default values when the environment variables are not set.
///
/// If you want to use the default configuration values, ignoring any environment variables, use
/// the [ClientBuilder::default] method to create a new [ClientBuilder] instance.
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    url: String,
    user_agent: String,
    download_url_pattern: Regex,
    source_file: Option<PathBuf>,
    request_timeout: u64,
    retry_count: u32,
    retry_initial_delay: u64,
    retry_backoff_factor: u64,
    retry_timeout: u64,
}

/*--------------------------------------------------------------------------------------
  Client Builder Implementation
--------------------------------------------------------------------------------------*/

impl Default for ClientBuilder {
    /// Create a new [ClientBuilder] with default configuration values.
    ///
    /// ```
    /// let client = azureipranges::ClientBuilder::default().build();
    ///
    /// assert_eq!(client.url(), azureipranges::DEFAULT_URL);
    /// assert_eq!(client.user_agent(), "My-user-agent");
    /// assert_eq!(client.source_file(), None);
    /// assert_eq!(client.request_timeout(), 30000);
    /// assert_eq!(client.retry_count(), 2);
    /// assert_eq!(client.retry_initial_delay(), 200);
    /// assert_eq!(client.retry_backoff_factor(), 2);
    /// assert_eq!(client.retry_timeout(), 60000);
    /// ```
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            download_url_pattern: DEFAULT_DOWNLOAD_URL_REGEX.clone(),
            source_file: None,
            request_timeout: 30_000, // 30 seconds
            retry_count: 2,
            retry_initial_delay: 200, // 200 ms
            retry_backoff_factor: 2,
            retry_timeout: 60_000, // 60 seconds
        }
    }
}

impl ClientBuilder {
    /// Create a new [ClientBuilder] reading initial configuration values from
    /// environment variables when set and default values when the environment
    /// variables are not set.
    ///
    /// The environment variables used to set the initial configuration values
    /// are:
    /// - `AZUREIPRANGES_URL`
    /// - `AZUREIPRANGES_USER_AGENT`
    /// - `AZUREIPRANGES_SOURCE_FILE`
    /// - `AZUREIPRANGES_REQUEST_TIMEOUT`
    /// - `AZUREIPRANGES_RETRY_COUNT`
    /// - `AZUREIPRANGES_RETRY_INITIAL_DELAY`
    /// - `AZUREIPRANGES_RETRY_BACKOFF_FACTOR`
    /// - `AZUREIPRANGES_RETRY_TIMEOUT`
    pub fn new() -> Self {
        let default = ClientBuilder::default();

        Self {
            url: get_env_var("AZUREIPRANGES_URL", default.url),
            user_agent: get_env_var("AZUREIPRANGES_USER_AGENT", default.user_agent),
            download_url_pattern: default.download_url_pattern,
            source_file: env::var("AZUREIPRANGES_SOURCE_FILE")
                .ok()
                .filter(|value| !value.is_empty())
                .map(PathBuf::from)
                .or(default.source_file),
            request_timeout: get_env_var("AZUREIPRANGES_REQUEST_TIMEOUT", default.request_timeout),
            retry_count: get_env_var("AZUREIPRANGES_RETRY_COUNT", default.retry_count),
            retry_initial_delay: get_env_var(
                "AZUREIPRANGES_RETRY_INITIAL_DELAY",
                default.retry_initial_delay,
            ),
            retry_backoff_factor: get_env_var(
                "AZUREIPRANGES_RETRY_BACKOFF_FACTOR",
                default.retry_backoff_factor,
            ),
            retry_timeout: get_env_var("AZUREIPRANGES_RETRY_TIMEOUT", default.retry_timeout),
        }
    }

    /*-------------------------------------------------------------------------
      Setters
    -------------------------------------------------------------------------*/

    /// Set the URL of the landing page that links to the Service Tags JSON file; defaults to
    /// the Microsoft download-confirmation page for the Azure IP Ranges and Service Tags
    /// (Public Cloud).
    pub fn url(&mut self, url: &str) -> &mut Self {
        self.url = url.to_string();
        self
    }

    /// Set the User-Agent header sent with the landing-page request; defaults to
    /// `My-user-agent`.
    pub fn user_agent(&mut self, user_agent: &str) -> &mut Self {
        self.user_agent = user_agent.to_string();
        self
    }

    /// Set the pattern used to find the download link in the landing page. The first match
    /// wins; capture group 1 is used as the download URL when present, otherwise the whole
    /// match.
    pub fn download_url_pattern(&mut self, download_url_pattern: Regex) -> &mut Self {
        self.download_url_pattern = download_url_pattern;
        self
    }

    /// Read the Service Tags JSON from a local file instead of locating and downloading it.
    pub fn source_file<P: AsRef<Path>>(&mut self, source_file: P) -> &mut Self {
        self.source_file = Some(source_file.as_ref().to_path_buf());
        self
    }

    /// Set the connect and read timeout (in milliseconds) for each HTTP request; defaults to
    /// `30000` milliseconds (30 seconds).
    pub fn request_timeout(&mut self, request_timeout: u64) -> &mut Self {
        self.request_timeout = request_timeout;
        self
    }

    /// Set the number of attempts for each HTTP request; defaults to `2` attempts (one retry).
    pub fn retry_count(&mut self, retry_count: u32) -> &mut Self {
        self.retry_count = retry_count;
        self
    }

    /// Set the initial delay (in milliseconds) between retry attempts; defaults to `200`
    /// milliseconds.
    ///
    /// The delay between retry attempts is calculated as:
    /// `retry_initial_delay * (retry_backoff_factor ^ attempt)`.
    pub fn retry_initial_delay(&mut self, retry_initial_delay: u64) -> &mut Self {
        self.retry_initial_delay = retry_initial_delay;
        self
    }

    /// Set the backoff factor used to increase the delay between retry attempts; defaults to
    /// `2`.
    pub fn retry_backoff_factor(&mut self, retry_backoff_factor: u64) -> &mut Self {
        self.retry_backoff_factor = retry_backoff_factor;
        self
    }

    /// Set the maximum time (in milliseconds) to keep retrying a request; defaults to `60000`
    /// milliseconds (60 seconds).
    pub fn retry_timeout(&mut self, retry_timeout: u64) -> &mut Self {
        self.retry_timeout = retry_timeout;
        self
    }

    /*-------------------------------------------------------------------------
      Build Method
    -------------------------------------------------------------------------*/

    pub fn build(&self) -> Client {
        Client {
            url: self.url.clone(),
            user_agent: self.user_agent.clone(),
            download_url_pattern: self.download_url_pattern.clone(),
            source_file: self.source_file.clone(),
            request_timeout: self.request_timeout,
            retry_count: self.retry_count,
            retry_initial_delay: self.retry_initial_delay,
            retry_backoff_factor: self.retry_backoff_factor,
            retry_timeout: self.retry_timeout,
        }
    }
}

/*-------------------------------------------------------------------------------------------------
  Client
-------------------------------------------------------------------------------------------------*/

/// A client for loading the Azure Service Tags, either from a local file or by locating the
/// download link on the Microsoft landing page and downloading the JSON. Network requests use a
/// simple exponential-backoff retry mechanism.
///
/// ```no_run
/// let client = azureipranges::Client::new();
/// let service_tags = client.get_service_tags().unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct Client {
    url: String,
    user_agent: String,
    download_url_pattern: Regex,
    source_file: Option<PathBuf>,
    request_timeout: u64,
    retry_count: u32,
    retry_initial_delay: u64,
    retry_backoff_factor: u64,
    retry_timeout: u64,
}

/*--------------------------------------------------------------------------------------
  Client Implementation
--------------------------------------------------------------------------------------*/

impl Default for Client {
    /// Create a new [Client] with default configuration values.
    fn default() -> Self {
        ClientBuilder::default().build()
    }
}

impl Client {
    pub fn new() -> Self {
        ClientBuilder::new().build()
    }

    /*-------------------------------------------------------------------------
      Getters
    -------------------------------------------------------------------------*/

    /// Get the URL of the landing page that links to the Service Tags JSON file.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Get the User-Agent header sent with the landing-page request.
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Get the pattern used to find the download link in the landing page.
    pub fn download_url_pattern(&self) -> &Regex {
        &self.download_url_pattern
    }

    /// Get the local Service Tags file, when configured.
    pub fn source_file(&self) -> Option<&Path> {
        self.source_file.as_deref()
    }

    pub fn request_timeout(&self) -> u64 {
        self.request_timeout
    }

    pub fn retry_count(&self) -> u32 {
        self.retry_count
    }

    pub fn retry_initial_delay(&self) -> u64 {
        self.retry_initial_delay
    }

    pub fn retry_backoff_factor(&self) -> u64 {
        self.retry_backoff_factor
    }

    pub fn retry_timeout(&self) -> u64 {
        self.retry_timeout
    }

    /// Where [Client::get_service_tags] loads the JSON from: the local source file when one is
    /// configured, otherwise the landing page.
    pub fn source(&self) -> Source {
        match &self.source_file {
            Some(source_file) => Source::Local(source_file.clone()),
            None => Source::Remote(self.url.clone()),
        }
    }

    /*-------------------------------------------------------------------------
      Get Service Tags
    -------------------------------------------------------------------------*/

    /// Loads, parses, and returns a boxed [ServiceTags] object.
    pub fn get_service_tags(&self) -> Result<Box<ServiceTags>> {
        let json = match self.source() {
            Source::Local(path) => self.get_json_from_file(&path)?,
            Source::Remote(_) => {
                let http_client = self.http_client()?;
                let download_url = self.locate_download_url(&http_client)?;
                self.get_text_from_url(&http_client, &download_url, None)?
            }
        };
        ServiceTags::from_json(&json)
    }

    /// Fetch the landing page and return the Service Tags download URL found in it.
    pub fn get_download_url(&self) -> Result<String> {
        let http_client = self.http_client()?;
        self.locate_download_url(&http_client)
    }

    /*-------------------------------------------------------------------------
      Private Methods
    -------------------------------------------------------------------------*/

    fn http_client(&self) -> Result<reqwest::blocking::Client> {
        let timeout = time::Duration::from_millis(self.request_timeout);
        Ok(reqwest::blocking::Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()?)
    }

    fn locate_download_url(&self, http_client: &reqwest::blocking::Client) -> Result<String> {
        let html = self.get_text_from_url(http_client, &self.url, Some(&self.user_agent))?;

        match find_download_url(&html, &self.download_url_pattern) {
            Some(download_url) => {
                info!("Found Service Tags download URL: {download_url}");
                Ok(download_url)
            }
            None => {
                warn!("No Service Tags download link found at {}", self.url);
                Err(Error::LocatorNotFound)
            }
        }
    }

    /// GET the body of a URL, retrying failed requests.
    fn get_text_from_url(
        &self,
        http_client: &reqwest::blocking::Client,
        url: &str,
        user_agent: Option<&str>,
    ) -> Result<String> {
        let start_time = time::Instant::now();
        let max_elapsed_time = time::Duration::from_millis(self.retry_timeout);

        let mut attempt: u32 = 0;
        loop {
            info!("GET {url}; Attempt {attempt}");

            let mut request = http_client.get(url);
            if let Some(user_agent) = user_agent {
                request = request.header(USER_AGENT, user_agent);
            }
            let text: Result<String> = request
                .send()
                .and_then(|response| response.error_for_status())
                .and_then(|response| response.text())
                .map_err(Error::from);

            match text {
                Ok(text) => {
                    info!("GET {url}; Attempt {attempt}: Ok");
                    break Ok(text);
                }
                Err(error) => {
                    warn!("GET {url}; Attempt {attempt}: FAILED: {error}");

                    let delay = time::Duration::from_millis(
                        self.retry_initial_delay
                            .saturating_mul(self.retry_backoff_factor.saturating_pow(attempt)),
                    );

                    attempt += 1;

                    if (start_time.elapsed() + delay < max_elapsed_time)
                        && (attempt < self.retry_count)
                    {
                        thread::sleep(delay);
                        continue;
                    } else {
                        break Err(error);
                    }
                }
            }
        }
    }

    /// Read the Service Tags JSON from a local file.
    fn get_json_from_file(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path)
            .map_err(|source| Error::Io {
                path: path.to_path_buf(),
                source,
            })
            .inspect(|_| info!("Read Service Tags JSON from: {:?}", path))
            .inspect_err(|error| warn!("{error}"))
    }
}

/*-------------------------------------------------------------------------------------------------
  Helper Functions
-------------------------------------------------------------------------------------------------*/

/// Find the first download link in an HTML page. Returns capture group 1 of the first match when
/// the pattern has one, otherwise the whole match.
pub fn find_download_url(html: &str, pattern: &Regex) -> Option<String> {
    pattern
        .captures(html)
        .and_then(|captures| captures.get(1).or_else(|| captures.get(0)))
        .map(|download_url| download_url.as_str().to_string())
}

/// Get and parse an environment variable value or return a default value.
fn get_env_var<T: std::str::FromStr>(env_var: &str, default: T) -> T {
    env::var(env_var)
        .ok()
        .and_then(|value| {
            value
                .parse::<T>()
                .inspect(|_| info!("Using {}: {}", env_var, value))
                .inspect_err(|_| warn!("Invalid {}: {}", env_var, value))
                .ok()
        })
        .unwrap_or(default)
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::errors::log_error;
    use env::VarError;
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use test_log::test;

    const SERVICE_TAGS_JSON: &str = r#"{
      "changeNumber": 1,
      "cloud": "Public",
      "values": [
        {
          "name": "AzureCloud.eastus",
          "properties": {"region": "eastus", "addressPrefixes": ["10.0.0.0/16"]}
        },
        {
          "name": "PowerBI",
          "properties": {"region": "", "addressPrefixes": ["10.0.1.0/24", "192.168.0.0/24"]}
        }
      ]
    }"#;

    const LANDING_PAGE_HTML: &str = r#"<html><body>
      <a href="https://www.microsoft.com/en-us/download/details.aspx?id=56519">Back</a>
      <a href="https://download.microsoft.com/download/7/1/D/71D86715-5596-4529-9B13-DA13A5DE5B63/ServiceTags_Public_20230807.json" class="mscom-link">click here</a>
      <a href='https://download.microsoft.com/download/0/0/0/ServiceTags_Public_20230731.json'>older</a>
    </body></html>"#;

    /*-------------------------------------------------------------------------
      Local HTTP Responder
    -------------------------------------------------------------------------*/

    /// Serve canned `(status, body)` responses, one connection each and in order, on an
    /// ephemeral local port. `responses` receives the server's base URL. The join handle returns
    /// the raw request heads received.
    fn serve<F>(responses: F) -> (String, thread::JoinHandle<Vec<String>>)
    where
        F: FnOnce(&str) -> Vec<(u16, String)>,
    {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let responses = responses(&base_url);

        let handle = thread::spawn(move || {
            let mut requests = Vec::new();
            for (status, body) in responses {
                let (mut stream, _) = listener.accept().unwrap();

                let mut reader = BufReader::new(stream.try_clone().unwrap());
                let mut request = String::new();
                loop {
                    let mut line = String::new();
                    let read = reader.read_line(&mut line).unwrap();
                    if read == 0 || line == "\r\n" {
                        break;
                    }
                    request.push_str(&line);
                }
                requests.push(request);

                let reason = match status {
                    200 => "OK",
                    404 => "Not Found",
                    _ => "Internal Server Error",
                };
                let response = format!(
                    "HTTP/1.1 {status} {reason}\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                stream.write_all(response.as_bytes()).unwrap();
            }
            requests
        });

        (base_url, handle)
    }

    /// Landing page linking to `/ServiceTags_Public_20230807.json` on the local responder.
    fn local_landing_page(base_url: &str) -> String {
        format!(r#"<html><a href="{base_url}/ServiceTags_Public_20230807.json">click here</a></html>"#)
    }

    fn local_download_url_pattern() -> Regex {
        Regex::new(r#"href=['"](http://127\.0\.0\.1:\d+/.+\.json)"#).unwrap()
    }

    /*-------------------------------------------------------------------------
      Test Download URL Pattern
    -------------------------------------------------------------------------*/

    #[test]
    fn test_find_download_url_first_match() {
        let download_url = find_download_url(LANDING_PAGE_HTML, &DEFAULT_DOWNLOAD_URL_REGEX);
        assert_eq!(
            download_url.as_deref(),
            Some("https://download.microsoft.com/download/7/1/D/71D86715-5596-4529-9B13-DA13A5DE5B63/ServiceTags_Public_20230807.json")
        );
    }

    #[test]
    fn test_find_download_url_single_quotes() {
        let html = "<a href='https://download.microsoft.com/download/1/2/3/ServiceTags_Public_20240101.json'>";
        let download_url = find_download_url(html, &DEFAULT_DOWNLOAD_URL_REGEX);
        assert_eq!(
            download_url.as_deref(),
            Some("https://download.microsoft.com/download/1/2/3/ServiceTags_Public_20240101.json")
        );
    }

    #[test]
    fn test_find_download_url_requires_href() {
        let html = "<p>https://download.microsoft.com/download/1/2/3/ServiceTags_Public_20240101.json</p>";
        assert_eq!(find_download_url(html, &DEFAULT_DOWNLOAD_URL_REGEX), None);
    }

    #[test]
    fn test_find_download_url_requires_json() {
        let html = r#"<a href="https://download.microsoft.com/download/1/2/3/ServiceTags.zip">"#;
        assert_eq!(find_download_url(html, &DEFAULT_DOWNLOAD_URL_REGEX), None);
    }

    #[test]
    fn test_find_download_url_requires_download_host() {
        let html = r#"<a href="https://example.com/download/1/2/3/ServiceTags_Public_20240101.json">"#;
        assert_eq!(find_download_url(html, &DEFAULT_DOWNLOAD_URL_REGEX), None);
    }

    #[test]
    fn test_find_download_url_pattern_without_group() {
        let pattern = Regex::new(r"https://[^ ]+\.json").unwrap();
        let download_url = find_download_url("see https://a.example/tags.json now", &pattern);
        assert_eq!(download_url.as_deref(), Some("https://a.example/tags.json"));
    }

    /*-------------------------------------------------------------------------
      Test Environment Variable Configuration
    -------------------------------------------------------------------------*/

    #[test]
    fn test_environment_variable_configuration() {
        let test_env_vars = [
            ("AZUREIPRANGES_URL", "https://my-landing-page.com/download"),
            ("AZUREIPRANGES_USER_AGENT", "azureipranges-test"),
            ("AZUREIPRANGES_SOURCE_FILE", "./scratch/ServiceTags_Public.json"),
            ("AZUREIPRANGES_REQUEST_TIMEOUT", "1500"),
            ("AZUREIPRANGES_RETRY_COUNT", "3"),
            ("AZUREIPRANGES_RETRY_INITIAL_DELAY", "100"),
            ("AZUREIPRANGES_RETRY_BACKOFF_FACTOR", "3"),
            ("AZUREIPRANGES_RETRY_TIMEOUT", "1000"),
        ];

        let default = Client::default();

        // Store environment variable values
        let stored_env_vars: Vec<(String, std::result::Result<String, VarError>)> = test_env_vars
            .iter()
            .map(|(env_var, _)| (env_var.to_string(), env::var(env_var)))
            .collect();

        // Unset all environment variables
        for (env_var, _) in test_env_vars.iter() {
            env::remove_var(env_var);
        }

        // Test default cases
        let new = Client::new();
        assert_eq!(new.url(), default.url());
        assert_eq!(new.user_agent(), default.user_agent());
        assert_eq!(new.source_file(), None);
        assert_eq!(new.source(), Source::Remote(DEFAULT_URL.to_string()));
        assert_eq!(new.request_timeout(), default.request_timeout());
        assert_eq!(new.retry_count(), default.retry_count());
        assert_eq!(new.retry_initial_delay(), default.retry_initial_delay());
        assert_eq!(new.retry_backoff_factor(), default.retry_backoff_factor());
        assert_eq!(new.retry_timeout(), default.retry_timeout());

        // Set all environment variables
        for (env_var, value) in test_env_vars.iter() {
            env::set_var(env_var, value);
        }

        // Test environment variable configuration
        let env_config = Client::new();
        assert_eq!(env_config.url(), "https://my-landing-page.com/download");
        assert_eq!(env_config.user_agent(), "azureipranges-test");
        assert_eq!(
            env_config.source(),
            Source::Local(PathBuf::from("./scratch/ServiceTags_Public.json"))
        );
        assert_eq!(env_config.request_timeout(), 1500);
        assert_eq!(env_config.retry_count(), 3);
        assert_eq!(env_config.retry_initial_delay(), 100);
        assert_eq!(env_config.retry_backoff_factor(), 3);
        assert_eq!(env_config.retry_timeout(), 1000);

        // Invalid values fall back to the defaults
        env::set_var("AZUREIPRANGES_RETRY_COUNT", "many");
        assert_eq!(Client::new().retry_count(), default.retry_count());

        // Reset environment variables
        for (env_var, value) in stored_env_vars {
            match value {
                Ok(value) => env::set_var(env_var, value),
                Err(VarError::NotPresent) => env::remove_var(env_var),
                Err(VarError::NotUnicode(value)) => env::set_var(env_var, value),
            }
        }
    }

    /*-------------------------------------------------------------------------
      Test Getter and Setter Methods
    -------------------------------------------------------------------------*/

    #[test]
    fn test_getter_and_setter_methods() {
        let client = ClientBuilder::default()
            .url("https://my-landing-page.com/download")
            .user_agent("azureipranges-test")
            .download_url_pattern(local_download_url_pattern())
            .source_file("./scratch/ServiceTags_Public.json")
            .request_timeout(1500)
            .retry_count(3)
            .retry_initial_delay(100)
            .retry_backoff_factor(3)
            .retry_timeout(1000)
            .build();

        assert_eq!(client.url(), "https://my-landing-page.com/download");
        assert_eq!(client.user_agent(), "azureipranges-test");
        assert_eq!(
            client.download_url_pattern().as_str(),
            local_download_url_pattern().as_str()
        );
        assert_eq!(
            client.source_file(),
            Some(Path::new("./scratch/ServiceTags_Public.json"))
        );
        assert_eq!(client.request_timeout(), 1500);
        assert_eq!(client.retry_count(), 3);
        assert_eq!(client.retry_initial_delay(), 100);
        assert_eq!(client.retry_backoff_factor(), 3);
        assert_eq!(client.retry_timeout(), 1000);
    }

    /*-------------------------------------------------------------------------
      Test Locating the Download URL
    -------------------------------------------------------------------------*/

    #[test]
    fn test_get_download_url() {
        let (base_url, server) = serve(|_| vec![(200, LANDING_PAGE_HTML.to_string())]);
        let client = ClientBuilder::default().url(&base_url).build();

        let download_url = client.get_download_url().inspect_err(log_error).unwrap();
        assert!(download_url.ends_with("ServiceTags_Public_20230807.json"));

        let requests = server.join().unwrap();
        assert_eq!(requests.len(), 1);
        assert!(requests[0]
            .to_lowercase()
            .contains("user-agent: my-user-agent"));
    }

    #[test]
    fn test_get_download_url_not_found() {
        let (base_url, server) = serve(|_| {
            vec![(
                200,
                "<html><body>Nothing to download here</body></html>".to_string(),
            )]
        });
        let client = ClientBuilder::default().url(&base_url).build();

        let result = client.get_download_url();
        assert!(matches!(result, Err(Error::LocatorNotFound)));
        assert_eq!(result.unwrap_err().exit_code(), 2);

        // A missing download link is not retried
        assert_eq!(server.join().unwrap().len(), 1);
    }

    #[test]
    fn test_get_download_url_http_error() {
        let (base_url, server) = serve(|_| vec![(404, "Not Found".to_string())]);
        let client = ClientBuilder::default()
            .url(&base_url)
            .retry_count(1)
            .build();

        let result = client.get_download_url();
        assert!(matches!(result, Err(Error::Network(_))));
        assert_eq!(result.unwrap_err().exit_code(), 1);
        server.join().unwrap();
    }

    #[test]
    fn test_get_download_url_retries_failed_request() {
        let (base_url, server) = serve(|_| {
            vec![
                (500, "Internal Server Error".to_string()),
                (200, LANDING_PAGE_HTML.to_string()),
            ]
        });
        let client = ClientBuilder::default()
            .url(&base_url)
            .retry_count(2)
            .retry_initial_delay(10)
            .build();

        let download_url = client.get_download_url().inspect_err(log_error);
        assert!(download_url.is_ok());
        assert_eq!(server.join().unwrap().len(), 2);
    }

    #[test]
    fn test_get_download_url_timeout() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let server = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            thread::sleep(time::Duration::from_millis(1000));
            drop(stream);
        });

        let client = ClientBuilder::default()
            .url(&base_url)
            .request_timeout(200)
            .retry_count(1)
            .build();

        let result = client.get_download_url();
        assert!(matches!(result, Err(Error::Network(_))));
        server.join().unwrap();
    }

    /*-------------------------------------------------------------------------
      Test Loading Service Tags
    -------------------------------------------------------------------------*/

    #[test]
    fn test_get_service_tags_remote() {
        let (base_url, server) = serve(|base_url| {
            vec![
                (200, local_landing_page(base_url)),
                (200, SERVICE_TAGS_JSON.to_string()),
            ]
        });
        let client = ClientBuilder::default()
            .url(&base_url)
            .download_url_pattern(local_download_url_pattern())
            .build();

        let service_tags = client.get_service_tags().inspect_err(log_error).unwrap();
        assert_eq!(service_tags.values().len(), 2);
        assert!(service_tags.get("PowerBI").is_some());

        let requests = server.join().unwrap();
        assert_eq!(requests.len(), 2);
        assert!(requests[0].starts_with("GET / "));
        assert!(requests[1].starts_with("GET /ServiceTags_Public_20230807.json "));
    }

    #[test]
    fn test_get_service_tags_remote_malformed_json() {
        let (base_url, server) = serve(|base_url| {
            vec![
                (200, local_landing_page(base_url)),
                (200, r#"{"values": "not an array"}"#.to_string()),
            ]
        });
        let client = ClientBuilder::default()
            .url(&base_url)
            .download_url_pattern(local_download_url_pattern())
            .build();

        let result = client.get_service_tags();
        assert!(matches!(result, Err(Error::MalformedInput(_))));
        assert_eq!(server.join().unwrap().len(), 2);
    }

    #[test]
    fn test_get_service_tags_remote_locator_not_found() {
        let (base_url, server) = serve(|_| vec![(200, "<html></html>".to_string())]);
        let client = ClientBuilder::default().url(&base_url).build();

        let result = client.get_service_tags();
        assert!(matches!(result, Err(Error::LocatorNotFound)));
        assert_eq!(server.join().unwrap().len(), 1);
    }

    #[test]
    fn test_get_service_tags_local() {
        let mut source_file = tempfile::NamedTempFile::new().unwrap();
        source_file.write_all(SERVICE_TAGS_JSON.as_bytes()).unwrap();

        // Unroutable landing page; a local source never touches the network
        let client = ClientBuilder::default()
            .url("http://127.0.0.1:9/unreachable")
            .source_file(source_file.path())
            .build();
        assert_eq!(
            client.source(),
            Source::Local(source_file.path().to_path_buf())
        );

        let service_tags = client.get_service_tags().inspect_err(log_error).unwrap();
        assert_eq!(service_tags.values().len(), 2);
        assert_eq!(service_tags.change_number(), Some(1));
    }

    #[test]
    fn test_get_service_tags_local_missing_file() {
        let client = ClientBuilder::default()
            .source_file("./scratch/does-not-exist/ServiceTags_Public.json")
            .build();

        let result = client.get_service_tags();
        assert!(matches!(result, Err(Error::Io { .. })));
    }

    #[test]
    fn test_get_service_tags_local_malformed_json() {
        let mut source_file = tempfile::NamedTempFile::new().unwrap();
        source_file.write_all(b"[1, 2, 3]").unwrap();

        let client = ClientBuilder::default()
            .source_file(source_file.path())
            .build();

        let result = client.get_service_tags();
        assert!(matches!(result, Err(Error::MalformedInput(_))));
    }
}
