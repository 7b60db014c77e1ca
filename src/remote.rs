//! Retrieval of parent devfiles served over HTTP(S)

use log::info;

use crate::error::{Error, Result};

/// Fetch `uri` and return the response body.
///
/// Any 2xx status is a success. Transport failures and every other status
/// become `Error::Fetch`.
pub fn fetch_document(agent: &ureq::Agent, uri: &str) -> Result<String> {
    let fetch_error = |message: String| Error::Fetch {
        uri: uri.to_string(),
        message,
    };

    let parsed = url::Url::parse(uri).map_err(|e| fetch_error(format!("invalid URL: {}", e)))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(fetch_error(format!(
            "unsupported URL scheme '{}'",
            parsed.scheme()
        )));
    }

    info!("Fetching parent devfile from {}", uri);
    let response = match agent.get(uri).call() {
        Ok(response) => response,
        Err(ureq::Error::Status(code, response)) => {
            return Err(fetch_error(format!("{} {}", code, response.status_text())));
        }
        Err(ureq::Error::Transport(transport)) => return Err(fetch_error(transport.to_string())),
    };

    if !(200..300).contains(&response.status()) {
        return Err(fetch_error(format!(
            "{} {}",
            response.status(),
            response.status_text()
        )));
    }

    response
        .into_string()
        .map_err(|e| fetch_error(format!("failed to read response body: {}", e)))
}

#[cfg(test)]
pub(crate) mod test_server {
    //! A one-shot HTTP server for exercising real request paths in tests.

    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::sync::mpsc;
    use std::thread;

    /// Serve a single request with the given status line and body.
    ///
    /// Returns the base URL and a receiver yielding the raw request head.
    pub fn serve_once(status: &str, body: &str) -> (String, mpsc::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let status = status.to_string();
        let body = body.to_string();
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut head = String::new();
            loop {
                let mut line = String::new();
                if reader.read_line(&mut line).unwrap() == 0 || line == "\r\n" {
                    break;
                }
                head.push_str(&line);
            }
            let _ = tx.send(head);
            let mut stream = stream;
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            stream.write_all(response.as_bytes()).unwrap();
        });

        (format!("http://{}", addr), rx)
    }
}
