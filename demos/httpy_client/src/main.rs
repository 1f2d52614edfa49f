//! HTTP/HTTPS クライアントの例
//!
//! 使い方:
//!   cargo run -p httpy_client -- https://example.com/
//!   cargo run -p httpy_client -- -X POST -d a=1 -d 'b=x y' http://httpbin.org/post
//!   cargo run -p httpy_client -- --head-only --verbose http://httpbin.org/get

use std::str::FromStr;

use httpy::{Headers, Method, StatusLine};
use tokio_httpy::{BlockingClient, Client, Response};

struct Options {
    method: Method,
    headers: Vec<(String, String)>,
    data: Vec<(String, String)>,
    json: Option<String>,
    user: Option<(String, String)>,
    head_only: bool,
    url: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (options, verbose) = parse_args()?;

    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    log::debug!("{} {}", options.method, options.url);
    let client = BlockingClient::new(Client::new())?;

    let mut request = client.client().request(options.method, &options.url);
    for (name, value) in &options.headers {
        request = request.header(name, value);
    }
    if !options.data.is_empty() {
        request = request.form(options.data.iter().map(|(k, v)| (k.as_str(), v.as_str())));
    }
    if let Some(json) = &options.json {
        request = request.json_text(json);
    }
    if let Some((user, password)) = &options.user {
        request = request.auth(user, password);
    }

    if options.head_only {
        let (status, headers) = client.block_on(async {
            let mut reader = request.build()?.fetch(false).await?;
            let status = reader.read_start_line().await?.clone();
            let headers = reader.read_headers().await?.clone();
            reader.close().await;
            Ok::<_, tokio_httpy::Error>((status, headers))
        })?;
        print_head(&status, &headers);
    } else {
        let response = client.fetch(request)?;
        print_response(&response);
    }

    client.shutdown();
    Ok(())
}

fn parse_args() -> Result<(Options, bool), Box<dyn std::error::Error>> {
    let mut args = noargs::raw_args();
    args.metadata_mut().app_name = "httpy_client";

    // --help フラグ
    noargs::HELP_FLAG.take_help(&mut args);

    // --version フラグ
    let version_flag: bool = noargs::flag("version")
        .short('V')
        .doc("Show version")
        .take(&mut args)
        .is_present();
    if version_flag {
        println!("{}", env!("CARGO_PKG_VERSION"));
        std::process::exit(0);
    }

    let verbose: bool = noargs::flag("verbose")
        .short('v')
        .doc("Enable debug logging")
        .take(&mut args)
        .is_present();

    let head_only: bool = noargs::flag("head-only")
        .doc("Read only the status line and headers")
        .take(&mut args)
        .is_present();

    let method: String = noargs::opt("request")
        .short('X')
        .doc("HTTP method (GET, POST, PUT, DELETE, HEAD)")
        .default("GET")
        .take(&mut args)
        .then(|o| Ok::<_, &str>(o.value().to_string()))
        .map_err(|e| format!("{:?}", e))?;

    // -H は複数回指定できる
    let mut headers = Vec::new();
    while let Some(header) = noargs::opt("header")
        .short('H')
        .doc("Request header ('Name: Value')")
        .take(&mut args)
        .present_and_then(|o| {
            o.value()
                .split_once(':')
                .map(|(name, value)| (name.trim().to_string(), value.trim().to_string()))
                .ok_or("header must be 'Name: Value'")
        })
        .map_err(|e| format!("{:?}", e))?
    {
        headers.push(header);
    }

    // -d は複数回指定できる
    let mut data = Vec::new();
    while let Some(pair) = noargs::opt("data")
        .short('d')
        .doc("Form field ('key=value'), sent as application/x-www-form-urlencoded")
        .take(&mut args)
        .present_and_then(|o| {
            Ok::<_, &str>(match o.value().split_once('=') {
                Some((key, value)) => (key.to_string(), value.to_string()),
                None => (o.value().to_string(), String::new()),
            })
        })
        .map_err(|e| format!("{:?}", e))?
    {
        data.push(pair);
    }

    let json: Option<String> = noargs::opt("json")
        .doc("JSON body (ignored when -d is given)")
        .take(&mut args)
        .present_and_then(|o| Ok::<_, &str>(o.value().to_string()))
        .map_err(|e| format!("{:?}", e))?;

    let user: Option<(String, String)> = noargs::opt("user")
        .short('u')
        .doc("Basic auth credentials ('user:password')")
        .take(&mut args)
        .present_and_then(|o| {
            Ok::<_, &str>(match o.value().split_once(':') {
                Some((user, password)) => (user.to_string(), password.to_string()),
                None => (o.value().to_string(), String::new()),
            })
        })
        .map_err(|e| format!("{:?}", e))?;

    // 位置引数: URL
    let url: String = noargs::arg("<URL>")
        .doc("URL to fetch (e.g., https://example.com/)")
        .take(&mut args)
        .then(|a| Ok::<_, &str>(a.value().to_string()))
        .map_err(|e| format!("{:?}", e))?;

    // 未知の引数があればエラー、ヘルプが返されたら表示
    if let Some(help) = args.finish().map_err(|e| format!("{:?}", e))? {
        print!("{}", help);
        std::process::exit(0);
    }

    let options = Options {
        method: Method::from_str(&method)?,
        headers,
        data,
        json,
        user,
        head_only,
        url,
    };
    Ok((options, verbose))
}

fn print_head(status: &StatusLine, headers: &Headers) {
    // 理由フレーズのないステータスラインは既知のフレーズで補う
    let reason = match status.reason_phrase() {
        "" => httpy::status::reason_phrase(status.status_code()).unwrap_or(""),
        reason => reason,
    };
    println!("{} {} {}", status.version(), status.status_code(), reason);
    for (name, value) in headers.iter() {
        println!("{}: {}", name, value);
    }
}

fn print_response(response: &Response) {
    print_head(&response.start_line, &response.headers);
    println!();

    // ボディを表示 (テキストの場合)
    if let Ok(body) = std::str::from_utf8(&response.body) {
        if body.len() > 1000 {
            let end = (0..=1000).rev().find(|&i| body.is_char_boundary(i)).unwrap_or(0);
            println!("{}...", &body[..end]);
            println!("\n[Body truncated, {} bytes total]", response.body.len());
        } else {
            println!("{}", body);
        }
    } else {
        println!("[Binary body, {} bytes]", response.body.len());
    }
}
