//! Drives `ThresholdEngine` against real in-process share-node HTTP
//! servers, over loopback TCP, rather than the local-fallback-key path
//! the unit tests use. Covers subset independence (§8 property 2): two
//! different responding 2-of-3 subsets of the same dealt secret must
//! produce the same derived tag.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Url;
use stealth_coordinator::testutil::sender::split_secret;
use stealth_coordinator::ThresholdEngine;
use stealth_crypto::{kdf, Point, Scalar, Share, TagCodec};
use stealth_node::app::build_router;
use stealth_node::handlers::AppState;

async fn spawn_node(index: u32, scalar: Scalar) -> (Url, tokio::task::JoinHandle<()>) {
    let share = Share::parse(index, &hex::encode(scalar.to_be_bytes())).unwrap();
    let state = Arc::new(AppState {
        share,
        auth_secret: None,
    });
    let router = build_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });

    (Url::parse(&format!("http://{addr}")).unwrap(), handle)
}

fn engine_over(nodes: Vec<Url>) -> ThresholdEngine {
    ThresholdEngine {
        nodes,
        threshold: 2,
        http_client: reqwest::Client::new(),
        http_timeout: Duration::from_secs(2),
        auth_secret: None,
        tag_codec: TagCodec::X32,
        strict_mpc: true,
        local_fallback_key: None,
    }
}

#[tokio::test]
async fn subset_independence_over_real_http_nodes() {
    let secret = Scalar::from_u64(13_371_337);
    let shares = split_secret(&secret, 2, 3);

    let mut urls = Vec::with_capacity(3);
    let mut handles = Vec::with_capacity(3);
    for (index, scalar) in shares {
        let (url, handle) = spawn_node(index, scalar).await;
        urls.push(url);
        handles.push(handle);
    }

    let r_scalar = Scalar::from_u64(424_242);
    let r_point = Point::generator().mul(&r_scalar);
    let expected_shared = r_point.mul(&secret);
    let expected_tag = kdf::derive_tag(&expected_shared, TagCodec::X32);

    // Nodes {1, 2} answer.
    let tag_12 = engine_over(vec![urls[0].clone(), urls[1].clone()])
        .derive_tag(&r_point)
        .await
        .unwrap();
    // Nodes {1, 3} answer instead.
    let tag_13 = engine_over(vec![urls[0].clone(), urls[2].clone()])
        .derive_tag(&r_point)
        .await
        .unwrap();

    assert_eq!(tag_12, expected_tag);
    assert_eq!(tag_13, expected_tag);
    assert_eq!(tag_12, tag_13);

    for handle in handles {
        handle.abort();
    }
}

#[tokio::test]
async fn gather_shares_succeeds_when_more_nodes_than_threshold_respond() {
    let secret = Scalar::from_u64(24_680);
    let shares = split_secret(&secret, 2, 3);

    let mut urls = Vec::with_capacity(3);
    let mut handles = Vec::with_capacity(3);
    for (index, scalar) in shares {
        let (url, handle) = spawn_node(index, scalar).await;
        urls.push(url);
        handles.push(handle);
    }

    let r_scalar = Scalar::from_u64(55_555);
    let r_point = Point::generator().mul(&r_scalar);
    let expected_shared = r_point.mul(&secret);
    let expected_tag = kdf::derive_tag(&expected_shared, TagCodec::X32);

    let tag = engine_over(urls).derive_tag(&r_point).await.unwrap();
    assert_eq!(tag, expected_tag);

    for handle in handles {
        handle.abort();
    }
}
