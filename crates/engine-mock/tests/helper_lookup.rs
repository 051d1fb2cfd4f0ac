//! Full placeholder lookups: helper + render cache + mock engine.

use renderpath::{RenderCache, XPathHelper};
use renderpath_engine_mock::MockXmlEngine;
use rstest::rstest;

fn helper() -> XPathHelper<MockXmlEngine> {
    XPathHelper::new(MockXmlEngine::new())
}

#[rstest]
fn first_match_is_serialized() {
    let helper = helper();
    let mut cache = RenderCache::new();

    let rendered = helper.evaluate(Some("<a><b>1</b></a>"), Some("//b"), &mut cache);
    assert_eq!(rendered, "<b>1</b>");
}

#[rstest]
fn text_and_attribute_steps_yield_literal_values() {
    let helper = helper();
    let mut cache = RenderCache::new();
    let payload = r#"<order id="42"><item>socks</item></order>"#;

    assert_eq!(helper.evaluate(Some(payload), Some("/order/item/text()"), &mut cache), "socks");
    assert_eq!(helper.evaluate(Some(payload), Some("/order/@id"), &mut cache), "42");
}

#[rstest]
fn only_the_first_of_several_matches_is_substituted() {
    let helper = helper();
    let mut cache = RenderCache::new();

    let rendered = helper.evaluate(Some("<a><b>1</b><b>2</b></a>"), Some("//b"), &mut cache);
    assert_eq!(rendered, "<b>1</b>");
}

#[rstest]
fn no_match_renders_the_empty_string() {
    let helper = helper();
    let mut cache = RenderCache::new();

    assert_eq!(helper.evaluate(Some("<a/>"), Some("//missing"), &mut cache), "");
}

#[rstest]
fn missing_input_renders_the_empty_string() {
    let helper = helper();
    let mut cache = RenderCache::new();

    assert_eq!(helper.evaluate(None, Some("//b"), &mut cache), "");
    assert_eq!(helper.evaluate(None, None, &mut cache), "");
}

#[rstest]
fn empty_expression_is_reported() {
    let helper = helper();
    let mut cache = RenderCache::new();

    let rendered = helper.evaluate(Some("<a/>"), None, &mut cache);
    assert!(rendered.contains("The XPath expression cannot be empty"));
}

#[rstest]
fn malformed_payload_is_reported_verbatim() {
    let helper = helper();
    let mut cache = RenderCache::new();

    let rendered = helper.evaluate(Some("<not xml"), Some("//b"), &mut cache);
    assert!(rendered.contains("<not xml is not valid XML"));
}

#[rstest]
fn malformed_expression_is_reported_verbatim() {
    let helper = helper();
    let mut cache = RenderCache::new();

    let rendered = helper.evaluate(Some("<a/>"), Some("//["), &mut cache);
    assert!(rendered.contains("//[ is not a valid XPath expression"));
}

#[rstest]
fn render_pass_parses_and_queries_each_identity_once() {
    let helper = helper();
    let mut cache = RenderCache::new();
    let payload = "<a><b>1</b></a>";

    // One template with the same placeholder repeated, plus one variation.
    for _ in 0..3 {
        assert_eq!(helper.evaluate(Some(payload), Some("//b"), &mut cache), "<b>1</b>");
    }
    assert_eq!(helper.evaluate(Some(payload), Some("/a/b/text()"), &mut cache), "1");

    assert_eq!(helper.engine().parse_calls(), 1);
    assert_eq!(helper.engine().query_calls(), 2);
}

#[rstest]
fn fresh_cache_means_fresh_work() {
    let helper = helper();
    let payload = "<a><b>1</b></a>";

    let mut first_pass = RenderCache::new();
    helper.evaluate(Some(payload), Some("//b"), &mut first_pass);
    drop(first_pass);

    // A new render pass owns a new cache; nothing leaks across.
    let mut second_pass = RenderCache::new();
    helper.evaluate(Some(payload), Some("//b"), &mut second_pass);

    assert_eq!(helper.engine().parse_calls(), 2);
    assert_eq!(helper.engine().query_calls(), 2);
}

#[rstest]
fn prefix_restricts_lookups_transparently() {
    let helper = XPathHelper::new(MockXmlEngine::new()).with_prefix("/envelope");
    let mut cache = RenderCache::new();
    let payload = "<envelope><body><b>inner</b></body></envelope>";

    assert_eq!(helper.evaluate(Some(payload), Some("/body/b"), &mut cache), "<b>inner</b>");

    // Errors echo the expression as written, without the prefix.
    let rendered = helper.evaluate(Some(payload), Some("//["), &mut cache);
    assert!(rendered.contains("//[ is not a valid XPath expression"));
    assert!(!rendered.contains("/envelope//["));
}
