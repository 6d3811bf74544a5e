// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Pagination behavior against canned HTTP responses.

use reqwest::Url;
use serde::Deserialize;
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ospager::{
    marker, Collection, ErrorKind, LinkedPage, MarkerPage, Page, Pager, ServiceClient, SinglePage,
    TokenAuth,
};

#[derive(Debug, Deserialize, PartialEq)]
struct Widget {
    id: String,
}

fn ids(widgets: &[Widget]) -> Vec<&str> {
    widgets.iter().map(|widget| widget.id.as_str()).collect()
}

fn client(server: &MockServer) -> ServiceClient {
    let _ = env_logger::builder().is_test(true).try_init();
    let auth = TokenAuth::new("abc123", server.uri()).unwrap();
    ServiceClient::new(reqwest::Client::new(), auth)
}

fn url(server: &MockServer, path: &str) -> Url {
    Url::parse(&format!("{}{}", server.uri(), path)).unwrap()
}

#[tokio::test]
async fn test_single_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/only"))
        .and(header("x-auth-token", "abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "widgets": [{"id": "a"}, {"id": "b"}, {"id": "c"}],
        })))
        .expect(1)
        .mount(&server)
        .await;

    let pager = Pager::new(
        client(&server),
        url(&server, "/only"),
        SinglePage::factory("widgets"),
    );
    let mut visits = 0;
    pager
        .each_page(|page| {
            visits += 1;
            assert_eq!(page.raw().status, 200);
            let widgets = page.items::<Widget>()?;
            assert_eq!(ids(&widgets), &["a", "b", "c"]);
            Ok(true)
        })
        .await
        .unwrap();
    assert_eq!(visits, 1);
}

#[tokio::test]
async fn test_linked_pages() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/page1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "widgets": [{"id": "a"}, {"id": "b"}, {"id": "c"}],
            "links": {"next": format!("{}/page2", server.uri())},
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/page2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "widgets": [{"id": "d"}, {"id": "e"}, {"id": "f"}],
            "links": {"next": format!("{}/page3", server.uri())},
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/page3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "widgets": [{"id": "g"}, {"id": "h"}, {"id": "i"}],
            "links": {"next": null},
        })))
        .expect(1)
        .mount(&server)
        .await;

    let pager = Pager::new(
        client(&server),
        url(&server, "/page1"),
        LinkedPage::factory("widgets"),
    );
    let widgets = pager.all_items::<Widget>().await.unwrap();
    assert_eq!(ids(&widgets), &["a", "b", "c", "d", "e", "f", "g", "h", "i"]);
}

#[tokio::test]
async fn test_linked_pages_compute_style() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/widgets"))
        .and(query_param_is_missing("page"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "widgets": [{"id": "a"}],
            "widgets_links": [
                {"rel": "next", "href": format!("{}/widgets?page=2", server.uri())},
            ],
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/widgets"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "widgets": [{"id": "b"}],
            "widgets_links": [],
        })))
        .expect(1)
        .mount(&server)
        .await;

    let pager = Pager::new(
        client(&server),
        url(&server, "/widgets"),
        LinkedPage::factory_with("widgets", "widgets_links", "next"),
    );
    let widgets = pager.all_items::<Widget>().await.unwrap();
    assert_eq!(ids(&widgets), &["a", "b"]);
}

#[tokio::test]
async fn test_marker_pages() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/widgets"))
        .and(query_param("limit", "3"))
        .and(query_param_is_missing("marker"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "widgets": [{"id": "aaa"}, {"id": "bbb"}, {"id": "ccc"}],
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/widgets"))
        .and(query_param("limit", "3"))
        .and(query_param("marker", "ccc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "widgets": [{"id": "ddd"}, {"id": "eee"}, {"id": "fff"}],
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/widgets"))
        .and(query_param("limit", "3"))
        .and(query_param("marker", "fff"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "widgets": [{"id": "ggg"}, {"id": "hhh"}],
        })))
        .expect(1)
        .mount(&server)
        .await;

    let pager = Pager::new(
        client(&server),
        url(&server, "/widgets"),
        MarkerPage::factory("widgets", marker::last_item_id("widgets", "id")),
    )
    .with_limit(3);
    let widgets = pager.all_items::<Widget>().await.unwrap();
    assert_eq!(
        ids(&widgets),
        &["aaa", "bbb", "ccc", "ddd", "eee", "fff", "ggg", "hhh"]
    );
}

// Five items in pages of 2, 2 and 1 must take exactly three requests; the
// mock expectations catch both a missing and an extra request.
#[tokio::test]
async fn test_marker_five_items_three_requests() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/widgets"))
        .and(query_param("limit", "2"))
        .and(query_param_is_missing("marker"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "widgets": [{"id": "a"}, {"id": "b"}],
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/widgets"))
        .and(query_param("limit", "2"))
        .and(query_param("marker", "b"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "widgets": [{"id": "c"}, {"id": "d"}],
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/widgets"))
        .and(query_param("limit", "2"))
        .and(query_param("marker", "d"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "widgets": [{"id": "e"}],
        })))
        .expect(1)
        .mount(&server)
        .await;

    let pager = Pager::new(
        client(&server),
        url(&server, "/widgets"),
        MarkerPage::factory("widgets", marker::last_item_id("widgets", "id")),
    )
    .with_limit(2);
    let widgets = pager.all_items::<Widget>().await.unwrap();
    assert_eq!(ids(&widgets), &["a", "b", "c", "d", "e"]);
}

// A full last page makes one more request, which comes back 204 with no
// body; the pager treats it as an empty page and stops normally.
#[tokio::test]
async fn test_marker_no_content_terminates() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/widgets"))
        .and(query_param("limit", "2"))
        .and(query_param_is_missing("marker"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "widgets": [{"id": "a"}, {"id": "b"}],
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/widgets"))
        .and(query_param("marker", "b"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let pager = Pager::new(
        client(&server),
        url(&server, "/widgets"),
        MarkerPage::factory("widgets", marker::last_item_id("widgets", "id")),
    )
    .with_limit(2);
    let widgets = pager.all_items::<Widget>().await.unwrap();
    assert_eq!(ids(&widgets), &["a", "b"]);
}

#[tokio::test]
async fn test_empty_first_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/widgets"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"widgets": []})))
        .expect(1)
        .mount(&server)
        .await;

    let pager = Pager::new(
        client(&server),
        url(&server, "/widgets"),
        LinkedPage::factory("widgets"),
    );
    let widgets = pager.all_items::<Widget>().await.unwrap();
    assert!(widgets.is_empty());
}

#[tokio::test]
async fn test_visitor_stop_fetches_no_further_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/page1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "widgets": [{"id": "a"}],
            "links": {"next": format!("{}/page2", server.uri())},
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/page2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"widgets": []})))
        .expect(0)
        .mount(&server)
        .await;

    let pager = Pager::new(
        client(&server),
        url(&server, "/page1"),
        LinkedPage::factory("widgets"),
    );
    let mut visits = 0;
    pager
        .each_page(|_page| {
            visits += 1;
            Ok(false)
        })
        .await
        .unwrap();
    assert_eq!(visits, 1);
}

#[tokio::test]
async fn test_http_error_aborts() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/page1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "widgets": [{"id": "a"}],
            "links": {"next": format!("{}/page2", server.uri())},
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/page2"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"message": "No such collection"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let pager = Pager::new(
        client(&server),
        url(&server, "/page1"),
        LinkedPage::factory("widgets"),
    );
    let mut visits = 0;
    let err = pager
        .each_page(|_page| {
            visits += 1;
            Ok(true)
        })
        .await
        .err()
        .unwrap();
    assert_eq!(visits, 1);
    assert_eq!(err.kind(), ErrorKind::ResourceNotFound);
    assert_eq!(err.status().map(|s| s.as_u16()), Some(404));
    assert!(err.to_string().contains("No such collection"));
}

#[tokio::test]
async fn test_malformed_body_aborts() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/widgets"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let pager = Pager::new(
        client(&server),
        url(&server, "/widgets"),
        LinkedPage::factory("widgets"),
    );
    let err = pager.all_items::<Widget>().await.err().unwrap();
    assert_eq!(err.kind(), ErrorKind::InvalidResponse);
}

#[cfg(feature = "stream")]
#[tokio::test]
async fn test_item_stream() {
    use futures::pin_mut;
    use futures::stream::TryStreamExt;

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/page1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "widgets": [{"id": "a"}, {"id": "b"}],
            "links": {"next": format!("{}/page2", server.uri())},
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/page2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "widgets": [{"id": "c"}],
        })))
        .expect(1)
        .mount(&server)
        .await;

    let pager = Pager::new(
        client(&server),
        url(&server, "/page1"),
        LinkedPage::factory("widgets"),
    );
    let items = pager.into_items::<Widget>();
    pin_mut!(items);
    let mut collected = Vec::new();
    while let Some(widget) = items.try_next().await.unwrap() {
        collected.push(widget);
    }
    assert_eq!(ids(&collected), &["a", "b", "c"]);
}

#[cfg(feature = "stream")]
#[tokio::test]
async fn test_page_stream_stops_on_drop() {
    use futures::pin_mut;
    use futures::stream::TryStreamExt;

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/page1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "widgets": [{"id": "a"}],
            "links": {"next": format!("{}/page2", server.uri())},
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/page2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"widgets": []})))
        .expect(0)
        .mount(&server)
        .await;

    let pager = Pager::new(
        client(&server),
        url(&server, "/page1"),
        LinkedPage::factory("widgets"),
    );
    let pages = pager.into_pages();
    pin_mut!(pages);
    let first = pages.try_next().await.unwrap().unwrap();
    assert!(!first.is_empty().unwrap());
    // The stream is dropped here; no request is made for page2.
}
