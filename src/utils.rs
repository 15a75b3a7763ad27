/// Declares actix handlers that delegate to `<name>_impl`. The impl returns
/// `anyhow::Result<HttpResponse>`; errors become an error page.
#[macro_export]
macro_rules! page_funcs {
    (
        $(
            (
                $func_name:ident,
                $method:ident,
                $url:literal,
                { $( $arg:ident : $ty:ty ),* $(,)? }
            )
        ),+
        $(,)?
    ) => {
        $(
            paste::paste! {
                #[actix_web::$method($url)]
                async fn $func_name( $( $arg: $ty ),* ) -> actix_web::HttpResponse {
                    match [<$func_name _impl>]( $( $arg ),* ).await {
                        Ok(response) => response,
                        Err(err) => $crate::protocol::error_response(&err),
                    }
                }
            }
        )+
    };
}

use actix_web::web;
use anyhow::anyhow;
use chrono::{DateTime, TimeZone};

pub fn format_time_str<Tz>(time: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    const TIME_FMT: &str = "%m/%d/%Y %H:%M %p";

    time.format(TIME_FMT).to_string()
}

pub fn now_str() -> String {
    format_time_str(&chrono::Local::now())
}

/// Runs blocking file work on actix's blocking pool.
pub async fn run_blocking<F, T>(f: F) -> anyhow::Result<T>
where
    F: FnOnce() -> anyhow::Result<T> + Send + 'static,
    T: Send + 'static,
{
    web::block(f)
        .await
        .map_err(|err| anyhow!("blocking task failed: {}", err))?
}
