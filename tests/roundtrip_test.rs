//! Round-trip tests: HTML → blocks → HTML → blocks must be stable.

use blockbridge::elements::VOID_ELEMENTS;
use blockbridge::{
    BlockNode, ConditionalSpec, ContentType, Error, LoopSpec, blocks_to_html, html_to_blocks,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

/// Parse, render, and parse again; both parses must agree.
fn assert_stable(html: &str) -> Vec<BlockNode> {
    let first = html_to_blocks(html);
    let rendered = blocks_to_html(&first).expect("render");
    let second = html_to_blocks(&rendered);
    assert_eq!(first, second, "unstable round trip via {rendered}");
    first
}

fn find_tag<'a>(blocks: &'a [BlockNode], tag: &str) -> Option<&'a BlockNode> {
    blocks.iter().find_map(|block| {
        if block.tag == tag {
            Some(block)
        } else {
            find_tag(&block.children, tag)
        }
    })
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_style_attribute_is_dropped() {
    let blocks = html_to_blocks(r#"<div style="color:red">x</div>"#);
    assert_eq!(blocks[0].content_type, ContentType::Text);
    assert_eq!(blocks_to_html(&blocks).unwrap(), "<div>x</div>");
}

#[test]
fn test_conditional_without_explicit_flag() {
    let blocks = html_to_blocks(r#"<div conditionalexpression="x>0">y</div>"#);
    let conditional = blocks[0].conditional.as_ref().unwrap();
    assert!(conditional.enabled);
    assert_eq!(conditional.expression, "x>0");
    assert_stable(r#"<div conditionalexpression="x>0">y</div>"#);
}

#[test]
fn test_loop_with_custom_variable() {
    let node = BlockNode::text("li", "x").with_loop(LoopSpec::new("items", "row"));
    let html = blocks_to_html(std::slice::from_ref(&node)).unwrap();
    assert_eq!(html, r#"<li loopsource="items" loopvariable="row">x</li>"#);
    assert_eq!(html_to_blocks(&html), vec![node]);
}

#[test]
fn test_loop_with_default_variable() {
    let node = BlockNode::text("li", "x").with_loop(LoopSpec::over("items"));
    let html = blocks_to_html(std::slice::from_ref(&node)).unwrap();
    assert!(!html.contains("loopvariable"));
    assert_eq!(
        html_to_blocks(&html)[0].loop_spec.as_ref().unwrap().variable,
        "item"
    );
    assert_eq!(html_to_blocks(&html), vec![node]);
}

#[test]
fn test_explicit_item_variable_is_omitted() {
    let blocks = html_to_blocks(r#"<p loopsource="xs" loopvariable="item">x</p>"#);
    assert_eq!(
        blocks_to_html(&blocks).unwrap(),
        r#"<p loopsource="xs">x</p>"#
    );
}

#[test]
fn test_disabled_conditional_round_trip() {
    let node = BlockNode::text("p", "x").with_conditional(ConditionalSpec {
        enabled: false,
        expression: "debug".to_string(),
    });
    let html = blocks_to_html(std::slice::from_ref(&node)).unwrap();
    assert_eq!(html_to_blocks(&html), vec![node]);
}

#[test]
fn test_attribute_escaping_round_trip() {
    let value = r#"<tag> & "double" 'single'"#;
    let node = BlockNode::empty("div").with_attr("title", value);
    let html = blocks_to_html(std::slice::from_ref(&node)).unwrap();

    assert_eq!(
        html,
        r#"<div title="&lt;tag&gt; &amp; &quot;double&quot; &#39;single&#39;"></div>"#
    );
    assert_eq!(html_to_blocks(&html)[0].attributes["title"], value);
}

#[test]
fn test_attribute_name_sanitization() {
    let node = BlockNode::empty("div")
        .with_attr("x:y", "1")
        .with_attr("data-ok_2", "2");
    let html = blocks_to_html(&[node]).unwrap();
    assert_eq!(html, r#"<div data-ok_2="2" xy="1"></div>"#);
}

#[test]
fn test_void_element_symmetry() {
    for tag in VOID_ELEMENTS {
        let node = BlockNode::empty(*tag);
        let html = blocks_to_html(std::slice::from_ref(&node)).unwrap();
        assert_eq!(html, format!("<{tag} />"));

        // Parse inside a container; `col` is only kept inside a table.
        let wrapped = if *tag == "col" {
            format!("<table><colgroup>{html}</colgroup></table>")
        } else {
            format!("<div>{html}</div>")
        };
        let blocks = html_to_blocks(&wrapped);
        let parsed = find_tag(&blocks, tag).unwrap_or_else(|| panic!("<{tag}> lost"));
        assert_eq!(parsed.content_type, ContentType::Empty);
        assert!(parsed.content.is_empty() && parsed.children.is_empty());
    }
}

#[test]
fn test_void_elements_reject_content() {
    for tag in VOID_ELEMENTS {
        let err = blocks_to_html(&[BlockNode::text(*tag, "x")]).unwrap_err();
        assert!(matches!(err, Error::MalformedNode { .. }), "<{tag}>");
    }
}

#[test]
fn test_mixed_content_is_preserved() {
    let html = r#"<p>Read the <a href="/docs?a=1&amp;b=2">docs</a> or <em>don't</em>.</p>"#;
    let blocks = assert_stable(html);
    assert_eq!(blocks[0].content_type, ContentType::Html);
    assert_eq!(
        blocks[0].content,
        r#"Read the <a href="/docs?a=1&amp;b=2">docs</a> or <em>don't</em>."#
    );
    assert_eq!(blocks_to_html(&blocks).unwrap(), html);
}

#[test]
fn test_raw_text_elements_are_stable() {
    let blocks = assert_stable(r#"<noscript><img src="x.png"></noscript>"#);
    assert_eq!(blocks[0].content_type, ContentType::Html);
    assert_eq!(blocks[0].content, r#"<img src="x.png">"#);
    assert_eq!(
        blocks_to_html(&blocks).unwrap(),
        r#"<noscript><img src="x.png"></noscript>"#
    );

    let blocks = assert_stable("<xmp>a &amp; b</xmp>");
    assert_eq!(blocks_to_html(&blocks).unwrap(), "<xmp>a &amp; b</xmp>");

    let blocks = assert_stable("<p>see <noscript><b>x</b></noscript> here</p>");
    assert_eq!(blocks[0].content, "see <noscript><b>x</b></noscript> here");

    let blocks = assert_stable("<iframe>a<b</iframe>");
    assert_eq!(blocks[0].content, "a<b");
}

#[test]
fn test_rcdata_elements_are_stable() {
    let blocks = assert_stable("<textarea>a &amp; <b></textarea>");
    assert_eq!(blocks[0].content, "a &amp; &lt;b&gt;");

    let blocks = assert_stable("<div><title>1 &lt; 2</title></div>");
    assert_eq!(blocks[0].children[0], BlockNode::text("title", "1 < 2"));
}

#[test]
fn test_preformatted_is_lossless() {
    let html = "<pre>\n\n  indented\n\ttab  </pre>";
    let blocks = assert_stable(html);
    assert_eq!(blocks[0].content, "\n  indented\n\ttab  ");

    assert_stable("<textarea>\n\nline</textarea>");
    assert_stable("<script>if (a < b && c) { x(); }</script>");
}

#[test]
fn test_realistic_page() {
    let html = r#"
        <header class="site-header" data-block-name="Header">
            <nav>
                <ul loopsource="menu.items" loopvariable="link">
                    <li><a href="{{ link.url }}">{{ link.title }}</a></li>
                </ul>
            </nav>
        </header>
        <main id="content">
            <article conditionalvisibility="true" conditionalexpression="post.published">
                <h1 setvariable="title" setexpression="post.title | upper">{{ title }}</h1>
                <figure><img src="/a.jpg" alt="A &amp; B"><figcaption>Caption</figcaption></figure>
                <p>First <strong>bold</strong> paragraph.</p>
                <pre><code>fn main() {
    println!("hi");
}</code></pre>
                <svg viewBox="0 0 10 10"><circle cx="5" cy="5" r="4"/></svg>
                <hr>
            </article>
        </main>
    "#;

    let blocks = assert_stable(html);
    assert_eq!(blocks.len(), 2);

    let header = &blocks[0];
    assert_eq!(header.block_identity.as_deref(), Some("Header"));
    let list = &header.children[0].children[0];
    assert_eq!(list.loop_spec, Some(LoopSpec::new("menu.items", "link")));

    let main = &blocks[1];
    assert_eq!(main.block_identity.as_deref(), Some("content"));
    assert_eq!(main.attributes["id"], "content");

    let article = &main.children[0];
    assert_eq!(article.conditional, Some(ConditionalSpec::new("post.published")));
    let kinds: Vec<_> = article.children.iter().map(|c| c.content_type).collect();
    assert_eq!(
        kinds,
        [
            ContentType::Text,
            ContentType::Blocks,
            ContentType::Html,
            ContentType::Html,
            ContentType::Html,
            ContentType::Empty,
        ]
    );
    assert_eq!(article.children[0].assignment.as_ref().unwrap().variable, "title");
    assert_eq!(article.children[1].children[0].attributes["alt"], "A & B");
}

#[test]
fn test_custom_tags_pass_through() {
    let blocks = assert_stable("<x-hero><hero-title>Big</hero-title><hero-body>a <b>b</b></hero-body></x-hero>");
    assert_eq!(blocks[0].tag, "x-hero");
    assert_eq!(blocks[0].children[1].content_type, ContentType::Html);
}

#[test]
fn test_json_shape() {
    let blocks = html_to_blocks(r#"<a href="/" class="btn" loopsource="xs">Go</a>"#);
    let json = serde_json::to_value(&blocks).unwrap();
    assert_eq!(
        json,
        serde_json::json!([{
            "tagName": "a",
            "contentType": "text",
            "content": "Go",
            "attributes": {"href": "/"},
            "className": "btn",
            "loop": {"source": "xs", "variable": "item"}
        }])
    );
}

// ============================================================================
// Property tests
// ============================================================================

fn text_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 &<>\"'.,!?-]{1,20}".prop_filter("needs visible text", |s| {
        !s.trim().is_empty()
    })
}

fn attr_value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 &<>\"'=/:;.-]{0,16}"
}

fn attrs_strategy() -> impl Strategy<Value = Vec<(String, String)>> {
    prop::collection::vec(
        (
            prop_oneof![
                Just("title".to_string()),
                Just("href".to_string()),
                Just("data-x".to_string()),
                Just("aria-label".to_string()),
                Just("class".to_string()),
                Just("loopsource".to_string()),
                Just("conditionalexpression".to_string()),
                Just("setvariable".to_string()),
            ],
            attr_value_strategy(),
        ),
        0..3,
    )
}

fn render_attrs(attrs: &[(String, String)]) -> String {
    let mut seen = std::collections::HashSet::new();
    attrs
        .iter()
        .filter(|(name, _)| seen.insert(name.clone()))
        .map(|(name, value)| {
            let value = value
                .replace('&', "&amp;")
                .replace('"', "&quot;")
                .replace('<', "&lt;");
            format!(r#" {name}="{value}""#)
        })
        .collect()
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

/// Elements whose content the parser does not tokenize as markup.
fn raw_text_tag() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("noscript"),
        Just("xmp"),
        Just("iframe"),
        Just("noembed"),
        Just("noframes"),
    ]
}

/// Random HTML built from generic, raw-text and RCDATA elements.
fn html_strategy() -> impl Strategy<Value = String> {
    let leaf = prop_oneof![
        (raw_text_tag(), attrs_strategy(), text_strategy())
            .prop_map(|(tag, attrs, text)| format!("<{tag}{}>{text}</{tag}>", render_attrs(&attrs))),
        (prop_oneof![Just("textarea"), Just("title")], text_strategy())
            .prop_map(|(tag, text)| format!("<{tag}>{}</{tag}>", escape(&text))),
        (raw_text_tag(), text_strategy(), text_strategy()).prop_map(|(tag, a, b)| {
            format!("<span>{} <{tag}>{b}</{tag}></span>", escape(&a))
        }),
        (prop_oneof![Just("p"), Just("h2"), Just("span"), Just("li")], attrs_strategy(), text_strategy())
            .prop_map(|(tag, attrs, text)| format!("<{tag}{}>{}</{tag}>", render_attrs(&attrs), escape(&text))),
        (prop_oneof![Just("br"), Just("hr"), Just("img"), Just("input")], attrs_strategy())
            .prop_map(|(tag, attrs)| format!("<{tag}{}>", render_attrs(&attrs))),
        (attrs_strategy(), text_strategy(), text_strategy()).prop_map(|(attrs, a, b)| {
            format!("<span{}>{} <b>{}</b></span>", render_attrs(&attrs), escape(&a), escape(&b))
        }),
        text_strategy().prop_map(|t| format!("<pre>  {}\n  </pre>", escape(&t))),
    ];

    leaf.prop_recursive(3, 16, 4, |inner| {
        (
            prop_oneof![Just("div"), Just("section"), Just("article")],
            attrs_strategy(),
            prop::collection::vec(inner, 0..4),
        )
            .prop_map(|(tag, attrs, children)| {
                format!("<{tag}{}>\n{}\n</{tag}>", render_attrs(&attrs), children.join("\n"))
            })
    })
}

proptest! {
    #[test]
    fn prop_html_round_trip_is_stable(html in html_strategy()) {
        let first = html_to_blocks(&html);
        let rendered = blocks_to_html(&first).unwrap();
        prop_assert_eq!(html_to_blocks(&rendered), first);
    }

    #[test]
    fn prop_rendering_is_idempotent(html in html_strategy()) {
        let once = blocks_to_html(&html_to_blocks(&html)).unwrap();
        let twice = blocks_to_html(&html_to_blocks(&once)).unwrap();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn prop_attribute_values_survive(value in "\\PC{0,24}") {
        let node = BlockNode::empty("div").with_attr("data-v", value.clone());
        let html = blocks_to_html(&[node]).unwrap();
        let parsed = html_to_blocks(&html);
        prop_assert_eq!(&parsed[0].attributes["data-v"], &value);
    }
}
