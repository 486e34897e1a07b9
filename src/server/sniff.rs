// src/server/sniff.rs

//! Minimal content-type detection for command output.
//!
//! Commands usually print plain text, but a dashboard script may just as well
//! print an HTML page. Only the first 512 bytes are inspected.

const SNIFF_LEN: usize = 512;

pub const TEXT_PLAIN: &str = "text/plain; charset=utf-8";
pub const TEXT_HTML: &str = "text/html; charset=utf-8";
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Tags that mark a body as HTML when they open the document.
const HTML_TAGS: &[&[u8]] = &[
    b"<!doctype html",
    b"<html",
    b"<head",
    b"<script",
    b"<iframe",
    b"<h1",
    b"<div",
    b"<font",
    b"<table",
    b"<a",
    b"<style",
    b"<title",
    b"<b",
    b"<body",
    b"<br",
    b"<p",
    b"<!--",
];

/// Guess a `Content-Type` for `body`.
pub fn content_type_for(body: &[u8]) -> &'static str {
    let head = &body[..body.len().min(SNIFF_LEN)];
    let trimmed = trim_leading_whitespace(head);

    if looks_like_html(trimmed) {
        return TEXT_HTML;
    }
    if head.iter().any(|&b| is_binary_byte(b)) {
        return OCTET_STREAM;
    }
    TEXT_PLAIN
}

fn trim_leading_whitespace(data: &[u8]) -> &[u8] {
    let start = data
        .iter()
        .position(|b| !matches!(b, b'\t' | b'\n' | b'\x0c' | b'\r' | b' '))
        .unwrap_or(data.len());
    &data[start..]
}

fn looks_like_html(data: &[u8]) -> bool {
    HTML_TAGS.iter().any(|tag| {
        if data.len() <= tag.len() || !data[..tag.len()].eq_ignore_ascii_case(tag) {
            return false;
        }
        // The tag must be terminated, so "<bold" does not count as "<b".
        matches!(data[tag.len()], b' ' | b'>')
    })
}

fn is_binary_byte(b: u8) -> bool {
    matches!(b, 0x00..=0x08 | 0x0b | 0x0e..=0x1a | 0x1c..=0x1f)
}
