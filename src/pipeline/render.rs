//! Render phase: run helpers on bound elements and serialize.
//!
//! Children are rendered lazily through [`TagOutput`]: a helper that asks
//! for child content triggers the subtree render, otherwise it happens
//! after all helpers ran. Suppressed elements never render their children.

use super::bind::{BoundElement, BoundNode, HelperInput, ImageInput};
use crate::config::ImageConfig;
use crate::debug;
use crate::helper::{ContentFuture, Helper, ImageTagHelper, RichTextWrap, TagContext, TagOutput};
use crate::html::{is_void_element, write_end_tag, write_start_tag};
use crate::media::ImageUrlService;

/// Shared, read-only render state.
#[derive(Clone, Copy)]
pub(crate) struct Env<'r> {
    pub service: &'r dyn ImageUrlService,
    pub image_config: &'r ImageConfig,
}

pub(crate) fn render_nodes<'r>(env: Env<'r>, nodes: &'r [BoundNode]) -> ContentFuture<'r> {
    Box::pin(async move {
        let mut out = String::new();
        for node in nodes {
            match node {
                BoundNode::Raw(raw) => out.push_str(raw),
                BoundNode::Element(elem) => render_element(env, elem, &mut out).await,
            }
        }
        out
    })
}

async fn render_element<'r>(env: Env<'r>, elem: &'r BoundElement, out: &mut String) {
    let mut helpers: Vec<Helper<'r>> = elem.helpers.iter().map(|h| instantiate(env, h)).collect();
    helpers.sort_by_key(|h| h.order());

    let context = TagContext::new(&elem.tag, &elem.declared);
    let mut output = TagOutput::new(&elem.tag, elem.attributes.clone())
        .with_deferred_content(move || render_nodes(env, &elem.children));

    for helper in &helpers {
        debug!("render"; "<{}> {} (order {})", elem.tag, helper.name(), helper.order());
        helper.run(&context, &mut output).await;
    }

    if output.is_suppressed() {
        debug!("render"; "<{}> suppressed", elem.tag);
        return;
    }

    let tag = output.tag_name().map(str::to_string);
    let attributes = std::mem::take(&mut output.attributes);
    let content = output.into_content().await;

    match tag {
        Some(tag) if is_void_element(&tag) => write_start_tag(out, &tag, &attributes),
        Some(tag) => {
            write_start_tag(out, &tag, &attributes);
            out.push_str(&content);
            write_end_tag(out, &tag);
        }
        None => out.push_str(&content),
    }
}

fn instantiate<'r>(env: Env<'r>, input: &'r HelperInput) -> Helper<'r> {
    match input {
        HelperInput::Attributes(helper) => Helper::Attributes(helper),
        HelperInput::Classes(helper) => Helper::Classes(helper),
        HelperInput::Image(input) => Helper::Image(image_helper(env, input)),
        HelperInput::RichText => Helper::RichText(RichTextWrap),
    }
}

fn image_helper<'r>(env: Env<'r>, input: &'r ImageInput) -> ImageTagHelper<'r> {
    let mut helper = ImageTagHelper::new(env.service, env.image_config)
        .srcset(input.srcset.clone())
        .sizes(input.sizes.clone());
    if let Some(image) = &input.image {
        helper = helper.image(image);
    }
    if let Some(constraint) = input.constraint {
        helper = helper.constraint(constraint);
    }
    if let Some(alt) = &input.alt {
        helper = helper.alt(alt.as_str());
    }
    if let Some(title) = &input.title {
        helper = helper.title(title.as_str());
    }
    if let Some(loading) = &input.loading {
        helper = helper.loading(loading.as_str());
    }
    helper
}
