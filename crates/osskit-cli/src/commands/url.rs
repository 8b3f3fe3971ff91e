//! url command - print unsigned or gateway URLs

use super::CommandContext;
use crate::object_path::ObjectPath;
use anyhow::Result;

pub fn execute(ctx: &CommandContext, path: &str, gateway: bool) -> Result<()> {
    let template = ctx.template()?;
    let uri = ObjectPath::parse(path)?;
    let key = uri.require_key(path)?;

    let url = if gateway {
        template.gateway_url(uri.bucket(), key)?
    } else {
        template.object_url(uri.bucket(), key)?
    };

    if ctx.is_json() {
        println!("{}", serde_json::json!({ "url": url }));
    } else {
        println!("{}", url);
    }

    Ok(())
}
