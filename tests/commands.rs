//! Command flow tests.
//!
//! Runs the three commands against wiremock and checks the files they write.

use std::time::{Duration, Instant};

use contentful_cleanup::commands::{
    self, Contentful, DetailsOptions, OrphanOptions, COL_ASSET_ID,
};
use contentful_cleanup::{Asset, CleanupError, Collection, Config, Pacing, ProgressMode};
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ASSETS_PATH: &str = "/spaces/space1/environments/master/assets";
const ENTRIES_PATH: &str = "/spaces/space1/environments/master/entries";
const USERS_PATH: &str = "/spaces/space1/users";

fn contentful(server: &MockServer, pacing: Pacing) -> Contentful {
    let config = Config::new("space1", "cma-token", "cda-token")
        .with_base_url(&server.uri())
        .with_pacing(pacing);
    Contentful::new(config, ProgressMode::Hidden).unwrap()
}

fn asset_json(id: &str, title: &str, created_by: Option<&str>) -> serde_json::Value {
    let mut asset = serde_json::json!({
        "sys": {
            "id": id,
            "type": "Asset",
            "createdAt": "2024-03-01T10:00:00.000Z",
            "updatedAt": "2024-03-02T10:00:00.000Z"
        },
        "fields": {
            "title": { "en-US": title },
            "file": { "en-US": { "fileName": format!("{id}.png"), "contentType": "image/png" } }
        }
    });
    if let Some(user) = created_by {
        asset["sys"]["createdBy"] =
            serde_json::json!({ "sys": { "type": "Link", "linkType": "User", "id": user } });
    }
    asset
}

fn array(items: Vec<serde_json::Value>, total: u64, limit: u64, skip: u64) -> serde_json::Value {
    serde_json::json!({
        "sys": { "type": "Array" },
        "total": total,
        "skip": skip,
        "limit": limit,
        "items": items
    })
}

async fn mount_links(server: &MockServer, asset_id: &str, total: u64) {
    Mock::given(method("GET"))
        .and(path(ENTRIES_PATH))
        .and(query_param("links_to_asset", asset_id))
        .respond_with(ResponseTemplate::new(200).set_body_json(array(vec![], total, 1, 0)))
        .mount(server)
        .await;
}

async fn mount_assets(server: &MockServer, assets: Vec<serde_json::Value>) {
    let total = assets.len() as u64;
    Mock::given(method("GET"))
        .and(path(ASSETS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(array(assets, total, 100, 0)))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_get_assets_writes_json_dump() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("assets.json");

    Mock::given(method("GET"))
        .and(path(ASSETS_PATH))
        .and(query_param("skip", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(array(
            vec![asset_json("a", "A", None), asset_json("b", "B", None)],
            3,
            2,
            0,
        )))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(ASSETS_PATH))
        .and(query_param("skip", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(array(
            vec![asset_json("c", "C", None)],
            3,
            2,
            2,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let cf = contentful(&server, Pacing::none());
    let assets = commands::get_assets(&cf, &output).await.unwrap();
    assert_eq!(assets.len(), 3);

    let written: Collection<Asset> =
        serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    let ids: Vec<&str> = written.items.iter().map(Asset::id).collect();
    assert_eq!(ids, vec!["a", "b", "c"]);
    assert_eq!(written.total, 3);

    // Timestamps are written exactly as the API sent them.
    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(raw["items"][0]["sys"]["createdAt"], "2024-03-01T10:00:00.000Z");
}

#[tokio::test]
async fn test_get_asset_details_from_input_file() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("assets.json");
    let output = dir.path().join("details.csv");

    std::fs::write(
        &input,
        serde_json::to_string(&array(
            vec![
                asset_json("a", "Hero, big", None),
                asset_json("b", "Logo", None),
                asset_json("c", "Unused", None),
            ],
            3,
            100,
            0,
        ))
        .unwrap(),
    )
    .unwrap();

    // Assets come from the file, so the listing endpoint must not be used.
    Mock::given(method("GET"))
        .and(path(ASSETS_PATH))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;
    mount_links(&server, "a", 2).await;
    mount_links(&server, "b", 1).await;

    let cf = contentful(&server, Pacing::none());
    let options = DetailsOptions {
        output_file: output.clone(),
        input_file: Some(input),
        max: Some(2),
        author: false,
    };
    let table = commands::get_asset_details(&cf, &options).await.unwrap();
    assert_eq!(table.len(), 2);

    let csv = std::fs::read_to_string(&output).unwrap();
    assert_eq!(
        csv,
        "Asset ID,Asset Title,Filename,Content Type,Published At,Updated At,Created At,Count of Linked Entries\n\
         a,Hero big,a.png,image/png,,2024-03-02T10:00:00.000Z,2024-03-01T10:00:00.000Z,2\n\
         b,Logo,b.png,image/png,,2024-03-02T10:00:00.000Z,2024-03-01T10:00:00.000Z,1\n"
    );
}

#[tokio::test]
async fn test_get_asset_details_with_author() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("details.csv");

    mount_assets(
        &server,
        vec![
            asset_json("a", "A", Some("u1")),
            asset_json("b", "B", Some("ghost")),
            asset_json("c", "C", None),
        ],
    )
    .await;
    mount_links(&server, "a", 1).await;
    mount_links(&server, "b", 0).await;
    mount_links(&server, "c", 5).await;

    Mock::given(method("GET"))
        .and(path(USERS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(array(
            vec![serde_json::json!({
                "sys": { "id": "u1", "type": "User" },
                "firstName": "Ada",
                "lastName": "Lovelace"
            })],
            1,
            100,
            0,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let cf = contentful(&server, Pacing::none());
    let options = DetailsOptions {
        output_file: output.clone(),
        author: true,
        ..Default::default()
    };
    commands::get_asset_details(&cf, &options).await.unwrap();

    let csv = std::fs::read_to_string(&output).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert!(lines[0].ends_with("Count of Linked Entries,Author"));
    assert!(lines[1].starts_with("a,A,"));
    assert!(lines[1].ends_with(",1,Ada Lovelace"));
    assert!(lines[2].ends_with(",0,N/A"));
    assert!(lines[3].ends_with(",5,N/A"));
    assert_eq!(lines.len(), 4);
}

#[tokio::test]
async fn test_find_orphaned_assets() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("orphans.csv");

    mount_assets(
        &server,
        vec![
            asset_json("used", "Used", None),
            asset_json("orphan-1", "Old", None),
            asset_json("orphan-2", "Older", None),
        ],
    )
    .await;
    mount_links(&server, "used", 3).await;
    mount_links(&server, "orphan-1", 0).await;
    mount_links(&server, "orphan-2", 0).await;

    let cf = contentful(&server, Pacing::none());
    let options = OrphanOptions {
        output_file: output.clone(),
        ..Default::default()
    };
    let orphans = commands::find_orphaned_assets(&cf, &options).await.unwrap();

    let ids: Vec<&str> = orphans.iter().map(Asset::id).collect();
    assert_eq!(ids, vec!["orphan-1", "orphan-2"]);
    assert_eq!(
        std::fs::read_to_string(&output).unwrap(),
        format!("{COL_ASSET_ID}\norphan-1\norphan-2\n")
    );
}

#[tokio::test]
async fn test_orphan_scan_pauses_every_seventh_asset() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    let assets: Vec<serde_json::Value> = (1..=15)
        .map(|n| asset_json(&format!("asset-{n}"), "A", None))
        .collect();
    mount_assets(&server, assets).await;
    Mock::given(method("GET"))
        .and(path(ENTRIES_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(array(vec![], 1, 1, 0)))
        .expect(15)
        .mount(&server)
        .await;

    let pause = Duration::from_millis(100);
    let cf = contentful(
        &server,
        Pacing {
            every: 7,
            pause,
            backoff: Duration::ZERO,
        },
    );
    let options = OrphanOptions {
        output_file: dir.path().join("orphans.csv"),
        ..Default::default()
    };

    let started = Instant::now();
    let orphans = commands::find_orphaned_assets(&cf, &options).await.unwrap();

    // Pauses after the 7th and 14th assets.
    assert!(started.elapsed() >= pause * 2);
    assert!(orphans.is_empty());
}

#[tokio::test]
async fn test_zero_max_is_rejected() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    mount_assets(&server, vec![asset_json("a", "A", None)]).await;

    let cf = contentful(&server, Pacing::none());
    let options = OrphanOptions {
        output_file: dir.path().join("orphans.csv"),
        max: Some(0),
        ..Default::default()
    };

    let result = commands::find_orphaned_assets(&cf, &options).await;
    assert!(matches!(result, Err(CleanupError::InvalidArgument(_))));
    assert!(!options.output_file.exists());
}

#[tokio::test]
async fn test_failed_lookup_aborts_without_writing() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("details.csv");

    mount_assets(&server, vec![asset_json("a", "A", None)]).await;
    Mock::given(method("GET"))
        .and(path(ENTRIES_PATH))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let cf = contentful(&server, Pacing::none());
    let options = DetailsOptions {
        output_file: output.clone(),
        ..Default::default()
    };

    let result = commands::get_asset_details(&cf, &options).await;
    assert!(matches!(
        result,
        Err(CleanupError::FetchFailed { status: Some(500), .. })
    ));
    assert!(!output.exists());
}

#[tokio::test]
async fn test_unwritable_output_is_file_error() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    mount_assets(&server, vec![]).await;

    let cf = contentful(&server, Pacing::none());
    let output = dir.path().join("missing-dir").join("assets.json");

    let result = commands::get_assets(&cf, &output).await;
    assert!(matches!(result, Err(CleanupError::FileIo { .. })));
}
