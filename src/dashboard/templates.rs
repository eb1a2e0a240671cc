use askama::Template;

use super::dto::{AboutContext, IndexContext};

#[derive(Template)]
#[template(path = "main/index.html")]
pub struct IndexTemplate<'a> {
    pub title: &'a str,
    pub ctx: &'a IndexContext,
    /// Chart series, pre-encoded for the inline script.
    pub dates_json: String,
    pub calories_json: String,
}

impl<'a> IndexTemplate<'a> {
    pub fn new(ctx: &'a IndexContext) -> Result<Self, serde_json::Error> {
        Ok(Self {
            title: "Home",
            ctx,
            dates_json: serde_json::to_string(&ctx.dates)?,
            calories_json: serde_json::to_string(&ctx.calories)?,
        })
    }
}

#[derive(Template)]
#[template(path = "main/about.html")]
pub struct AboutTemplate {
    pub title: &'static str,
}

impl From<AboutContext> for AboutTemplate {
    fn from(ctx: AboutContext) -> Self {
        Self { title: ctx.title }
    }
}
