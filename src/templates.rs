use handlebars::{Context, Handlebars, Helper, HelperResult, Output, RenderContext, RenderError};

const TEMPLATES: [(&str, &str); 8] = [
    ("name_form", include_str!("../templates/name_form.hbs")),
    ("names", include_str!("../templates/names.hbs")),
    ("channel_form", include_str!("../templates/channel_form.hbs")),
    ("channel_results", include_str!("../templates/channel_results.hbs")),
    ("video_form", include_str!("../templates/video_form.hbs")),
    ("video_results", include_str!("../templates/video_results.hbs")),
    ("search_history", include_str!("../templates/search_history.hbs")),
    ("not_found", include_str!("../templates/not_found.hbs")),
];

/// Renders a channel's subscribed flag as a sentence.
fn subscription_status(h: &Helper, _: &Handlebars, _: &Context, _: &mut RenderContext, out: &mut dyn Output) -> HelperResult {
    let flag = h.param(0)
        .and_then(|v| v.value().as_str())
        .ok_or_else(|| RenderError::new("subscription_status needs the subscribed flag"))?;
    let sentence = match flag {
        "yes" => "The user is subscribed to this channel.",
        "no" => "The user is NOT subscribed to this channel.",
        _ => "not everything is filled out correctly",
    };
    out.write(sentence)?;
    Ok(())
}

pub fn register() -> Result<Handlebars<'static>, failure::Error> {
    let mut hb = Handlebars::new();
    hb.register_partial("nav", include_str!("../templates/nav.hbs"))?;
    for (name, source) in TEMPLATES.iter() {
        hb.register_template_string(name, source)?;
    }
    hb.register_helper("subscription_status", Box::new(subscription_status));
    Ok(hb)
}
