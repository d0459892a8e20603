use axum::{http::StatusCode, response::Response};
use serde::Serialize;

use super::extract::respond;

const LYRICS: &str = "I'm a little teapot, Short and stout,\n\
Here is my handle. Here is my spout.\n\
When I get all steamed up, Hear me shout,\n\
Tip me over and pour me out!";

#[derive(Debug, Serialize)]
pub struct Verse {
    pub lyrics: &'static str,
}

pub async fn teapot() -> Response {
    respond(vec![Verse { lyrics: LYRICS }], StatusCode::IM_A_TEAPOT)
}
