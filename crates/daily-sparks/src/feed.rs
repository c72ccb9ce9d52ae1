//! RSS and OPML feed assembly.
//!
//! Both documents are built with `quick-xml`'s writer so text content is
//! escaped properly. Channel metadata comes from the `[site]` config
//! section; items are the most recent posts, body omitted.

use anyhow::Result;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Cursor;

use daily_sparks_core::models::ContentItem;

use crate::config::SiteConfig;

fn post_url(site: &SiteConfig, slug: &str) -> String {
    format!("{}/posts/{}", site.url.trim_end_matches('/'), slug)
}

fn format_ts_rfc2822(ts: i64) -> String {
    chrono::DateTime::from_timestamp(ts, 0)
        .map(|dt| dt.to_rfc2822())
        .unwrap_or_else(|| ts.to_string())
}

fn text_element<W: std::io::Write>(writer: &mut Writer<W>, name: &str, text: &str) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

/// Render the RSS 2.0 feed for the most recent posts.
pub fn build_rss(site: &SiteConfig, items: &[ContentItem]) -> Result<String> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut rss = BytesStart::new("rss");
    rss.push_attribute(("version", "2.0"));
    writer.write_event(Event::Start(rss))?;
    writer.write_event(Event::Start(BytesStart::new("channel")))?;

    text_element(&mut writer, "title", &site.title)?;
    text_element(&mut writer, "link", &site.url)?;
    text_element(&mut writer, "description", &site.description)?;

    for item in items {
        writer.write_event(Event::Start(BytesStart::new("item")))?;
        text_element(&mut writer, "title", &item.title)?;
        text_element(&mut writer, "link", &post_url(site, &item.slug))?;

        let mut guid = BytesStart::new("guid");
        guid.push_attribute(("isPermaLink", "true"));
        writer.write_event(Event::Start(guid))?;
        writer.write_event(Event::Text(BytesText::new(&post_url(site, &item.slug))))?;
        writer.write_event(Event::End(BytesEnd::new("guid")))?;

        text_element(&mut writer, "category", &item.category)?;
        if let Some(author) = &item.author {
            text_element(&mut writer, "author", author)?;
        }
        text_element(
            &mut writer,
            "description",
            item.meta_description.as_deref().unwrap_or(""),
        )?;
        text_element(&mut writer, "pubDate", &format_ts_rfc2822(item.created_at))?;
        writer.write_event(Event::End(BytesEnd::new("item")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("channel")))?;
    writer.write_event(Event::End(BytesEnd::new("rss")))?;

    Ok(String::from_utf8(writer.into_inner().into_inner())?)
}

/// Render the OPML subscription document pointing at the RSS feed.
pub fn build_opml(site: &SiteConfig) -> Result<String> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut opml = BytesStart::new("opml");
    opml.push_attribute(("version", "2.0"));
    writer.write_event(Event::Start(opml))?;

    writer.write_event(Event::Start(BytesStart::new("head")))?;
    text_element(&mut writer, "title", &site.title)?;
    writer.write_event(Event::End(BytesEnd::new("head")))?;

    writer.write_event(Event::Start(BytesStart::new("body")))?;
    let mut outline = BytesStart::new("outline");
    outline.push_attribute(("type", "rss"));
    outline.push_attribute(("text", site.title.as_str()));
    let feed_url = format!("{}/feed.xml", site.url.trim_end_matches('/'));
    outline.push_attribute(("xmlUrl", feed_url.as_str()));
    outline.push_attribute(("htmlUrl", site.url.as_str()));
    writer.write_event(Event::Empty(outline))?;
    writer.write_event(Event::End(BytesEnd::new("body")))?;

    writer.write_event(Event::End(BytesEnd::new("opml")))?;

    Ok(String::from_utf8(writer.into_inner().into_inner())?)
}
