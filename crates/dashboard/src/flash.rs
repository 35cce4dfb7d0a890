//! One-shot notices carried across a redirect in a cookie

use axum::http::{header, HeaderMap, HeaderValue};
use axum::response::{IntoResponse, Redirect, Response};
use url::form_urlencoded;

const COOKIE_NAME: &str = "flash";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Success,
    Error,
}

impl Level {
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Success => "success",
            Level::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flash {
    pub level: Level,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: Level::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: Level::Error,
            message: message.into(),
        }
    }

    fn cookie(&self) -> String {
        let value = form_urlencoded::Serializer::new(String::new())
            .append_pair("level", self.level.as_str())
            .append_pair("message", &self.message)
            .finish();
        format!("{}={}; Path=/; HttpOnly; SameSite=Lax", COOKIE_NAME, value)
    }

    /// Notice left by the previous response, if any
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let value = headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|cookies| cookies.split(';'))
            .find_map(|pair| {
                let (name, value) = pair.trim().split_once('=')?;
                (name == COOKIE_NAME && !value.is_empty()).then_some(value)
            })?;

        let mut level = None;
        let mut message = None;
        for (key, val) in form_urlencoded::parse(value.as_bytes()) {
            match key.as_ref() {
                "level" if val == "success" => level = Some(Level::Success),
                "level" if val == "error" => level = Some(Level::Error),
                "message" => message = Some(val.into_owned()),
                _ => {}
            }
        }

        Some(Self {
            level: level?,
            message: message?,
        })
    }
}

/// Redirect that leaves a notice for the next page
pub fn redirect_with(to: &str, flash: Flash) -> Response {
    let mut response = Redirect::to(to).into_response();
    if let Ok(cookie) = HeaderValue::from_str(&flash.cookie()) {
        response.headers_mut().append(header::SET_COOKIE, cookie);
    }
    response
}

/// Expire the notice once it has been shown
pub fn clear(response: &mut Response) {
    response.headers_mut().append(
        header::SET_COOKIE,
        HeaderValue::from_static("flash=; Path=/; Max-Age=0"),
    );
}
