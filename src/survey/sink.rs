// The remote copy of the responses.

use std::time::Duration;

use reqwest::blocking::Client;

use crate::survey::*;

/// Receives a copy of every new response.
pub trait RecordSink {
    fn submit(&self, record: &SurveyRecord) -> SurveyResult<()>;
}

/// Posts the response as JSON to a fixed URL.
///
/// Only a transport failure is reported: the status and the body of the
/// answer are not looked at.
pub struct HttpSink {
    url: String,
    client: Client,
}

impl HttpSink {
    /// No timeout is applied unless one is given.
    pub fn new(url: &str, timeout: Option<Duration>) -> SurveyResult<HttpSink> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context(SinkClientSnafu { url })?;
        Ok(HttpSink {
            url: url.to_string(),
            client,
        })
    }
}

impl RecordSink for HttpSink {
    fn submit(&self, record: &SurveyRecord) -> SurveyResult<()> {
        info!("submit: sending the response to {}", self.url);
        let resp = self
            .client
            .post(&self.url)
            .json(record)
            .send()
            .context(SinkTransportSnafu { url: &self.url })?;
        debug!("submit: {} answered {}", self.url, resp.status());
        Ok(())
    }
}
