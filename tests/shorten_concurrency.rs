use shortlink::application::services::{LinkService, RedirectResolver, ShortenSettings};
use shortlink::infrastructure::persistence::InMemoryLinkRepository;
use shortlink::utils::code_generator::CodeStrategy;
use std::collections::HashSet;
use std::sync::Arc;

async fn shorten_concurrently(settings: ShortenSettings, requests: usize) {
    let repo = Arc::new(InMemoryLinkRepository::new());
    let service = Arc::new(LinkService::new(repo.clone(), settings));
    let resolver = RedirectResolver::new(repo.clone());

    let handles: Vec<_> = (0..requests)
        .map(|i| {
            let service = service.clone();
            tokio::spawn(async move {
                let url = format!("https://example.com/page/{i}?ref=load");
                let link = service
                    .shorten(&url, Some(format!("owner-{}", i % 7)))
                    .await
                    .unwrap();
                (link.short_code, url)
            })
        })
        .collect();

    let mut codes = HashSet::new();
    for handle in handles {
        let (code, url) = handle.await.unwrap();
        assert!(codes.insert(code.clone()), "duplicate code {code}");
        assert_eq!(resolver.resolve(&code).await.unwrap(), url);
    }

    assert_eq!(codes.len(), requests);
    assert_eq!(repo.len(), requests);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_concurrent_random_codes_are_distinct() {
    shorten_concurrently(ShortenSettings::default(), 500).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_concurrent_sequential_codes_are_distinct() {
    let settings = ShortenSettings {
        strategy: CodeStrategy::Sequential,
        max_attempts: 5,
    };
    shorten_concurrently(settings, 500).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_concurrent_short_random_codes_are_distinct() {
    // 62^4 codes: collisions are possible and must be retried, never shared.
    let settings = ShortenSettings {
        strategy: CodeStrategy::Random { length: 4 },
        max_attempts: 20,
    };
    shorten_concurrently(settings, 300).await;
}

#[tokio::test]
async fn test_scenario_custom_code_round_trip() {
    let repo = Arc::new(InMemoryLinkRepository::new());
    let service = LinkService::new(repo.clone(), ShortenSettings::default());
    let resolver = RedirectResolver::new(repo);

    let link = service
        .shorten_with_code("https://example.com/a/very/long/path", "b7F3x2", None)
        .await
        .unwrap();
    assert_eq!(link.short_code, "b7F3x2");

    assert_eq!(
        resolver.resolve("b7F3x2").await.unwrap(),
        "https://example.com/a/very/long/path"
    );
    assert!(resolver.resolve("zzzzzz").await.is_err());
}
