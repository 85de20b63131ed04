//! Integration tests for the rooms API endpoints

mod test_utils;

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
    };
    use mockito::Matcher;
    use serde_json::{Value, json};
    use tower::util::ServiceExt;

    use crate::test_utils::{body_to_string, mock_directory, mock_timetable, test_app};

    const MORNING: &str = "datefrom=2024-03-11T08:00:00Z&dateto=2024-03-11T13:00:00Z";

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn room_ids(building: &Value) -> Vec<String> {
        building["rooms"]
            .as_array()
            .unwrap()
            .iter()
            .map(|room| room["id"].as_str().unwrap().to_string())
            .collect()
    }

    /// Tests free rooms are returned per building in directory order
    #[tokio::test]
    async fn it_returns_free_rooms_per_building() {
        let mut server = mockito::Server::new_async().await;
        let _directory = mock_directory(&mut server).await;
        let _a = mock_timetable(&mut server, "A").await;
        let _b = mock_timetable(&mut server, "B").await;
        let app = test_app(&server.url());

        let response = app
            .oneshot(get(&format!("/api/rooms?{}", MORNING)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CACHE_CONTROL).unwrap(),
            "public, max-age=600"
        );

        let body: Value = serde_json::from_str(&body_to_string(response.into_body()).await).unwrap();
        let buildings = body.as_array().unwrap();
        assert_eq!(buildings.len(), 2);

        assert_eq!(buildings[0]["id"], "A");
        assert_eq!(buildings[0]["name"], "Edificio A");
        assert_eq!(buildings[0]["status"], "ok");
        // A1 is booked at 11:00 and A3 at 08:00
        assert_eq!(room_ids(&buildings[0]), vec!["A2", "A4"]);
        assert_eq!(
            buildings[0]["rooms"][1],
            json!({"id": "A4", "name": "Aula Studio A4", "capacity": 60, "studyRoom": true})
        );

        assert_eq!(buildings[1]["id"], "B");
        assert_eq!(room_ids(&buildings[1]), vec!["B1", "B2"]);
    }

    /// Tests a building whose timetable fails is reported without failing the request
    #[tokio::test]
    async fn it_reports_a_failed_building() {
        let mut server = mockito::Server::new_async().await;
        let _directory = mock_directory(&mut server).await;
        let _b = mock_timetable(&mut server, "B").await;
        let _a = server
            .mock("GET", "/rooms_call_new.php")
            .match_query(Matcher::UrlEncoded("sede".into(), "A".into()))
            .with_status(500)
            .with_body("Fatal error")
            .create_async()
            .await;
        let app = test_app(&server.url());

        let response = app
            .oneshot(get(&format!("/api/rooms?{}", MORNING)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body: Value = serde_json::from_str(&body_to_string(response.into_body()).await).unwrap();
        assert_eq!(body[0]["id"], "A");
        assert_eq!(body[0]["status"], "failed");
        assert!(body[0]["error"].as_str().unwrap().contains("500"));
        assert!(body[0].get("rooms").is_none());

        assert_eq!(body[1]["status"], "ok");
        assert_eq!(room_ids(&body[1]), vec!["B1", "B2"]);
    }

    /// Tests instants off a slot boundary fail each building but not the request
    #[tokio::test]
    async fn it_reports_misaligned_ranges_per_building() {
        let mut server = mockito::Server::new_async().await;
        let _directory = mock_directory(&mut server).await;
        let _a = mock_timetable(&mut server, "A").await;
        let _b = mock_timetable(&mut server, "B").await;
        let app = test_app(&server.url());

        let response = app
            .oneshot(get(
                "/api/rooms?datefrom=2024-03-11T08:30:00Z&dateto=2024-03-11T13:00:00Z",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body: Value = serde_json::from_str(&body_to_string(response.into_body()).await).unwrap();
        for building in body.as_array().unwrap() {
            assert_eq!(building["status"], "failed");
            assert!(building["error"].as_str().unwrap().contains("No slot found"));
        }
    }

    /// Tests seconds are dropped before matching slots
    #[tokio::test]
    async fn it_truncates_seconds_before_matching() {
        let mut server = mockito::Server::new_async().await;
        let _directory = mock_directory(&mut server).await;
        let _a = mock_timetable(&mut server, "A").await;
        let _b = mock_timetable(&mut server, "B").await;
        let app = test_app(&server.url());

        let response = app
            .oneshot(get(
                "/api/rooms?datefrom=2024-03-11T12:00:59Z&dateto=2024-03-11T14:00:30.500Z",
            ))
            .await
            .unwrap();

        let body: Value = serde_json::from_str(&body_to_string(response.into_body()).await).unwrap();
        assert_eq!(room_ids(&body[0]), vec!["A1", "A2", "A3", "A4"]);
        // B2 is booked from 14:00
        assert_eq!(room_ids(&body[1]), vec!["B1"]);
    }

    /// Tests the range defaults to today between 08:00 and 20:00
    #[tokio::test]
    async fn it_defaults_to_today() {
        let mut server = mockito::Server::new_async().await;
        let _directory = mock_directory(&mut server).await;
        let today = chrono::Local::now().format("%d-%m-%Y").to_string();
        let timetable = server
            .mock("GET", "/rooms_call_new.php")
            .match_query(Matcher::UrlEncoded("date".into(), today))
            .with_status(200)
            .with_body(r#"{"fasce": [], "table": {}, "area_rooms": {}}"#)
            .expect(2)
            .create_async()
            .await;
        let app = test_app(&server.url());

        let response = app.oneshot(get("/api/rooms")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        timetable.assert_async().await;
    }

    /// Tests a malformed datefrom surfaces as a server error
    #[tokio::test]
    async fn it_returns_500_for_malformed_datefrom() {
        let server = mockito::Server::new_async().await;
        let app = test_app(&server.url());

        let response = app
            .oneshot(get("/api/rooms?datefrom=not-a-date"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_to_string(response.into_body()).await;
        assert!(body.contains("Invalid ISO-8601 date-time"));
    }

    /// Tests a broken building directory fails the whole request
    #[tokio::test]
    async fn it_returns_500_when_the_directory_fails() {
        let mut server = mockito::Server::new_async().await;
        let _directory = server
            .mock("GET", "/combo_call_new.php")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("<html>Servizio non disponibile</html>")
            .create_async()
            .await;
        let app = test_app(&server.url());

        let response = app
            .oneshot(get(&format!("/api/rooms?{}", MORNING)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_to_string(response.into_body()).await;
        assert!(body.contains("Failed to fetch building directory"));
    }

    /// Tests identical requests are answered from cache
    #[tokio::test]
    async fn it_caches_identical_requests() {
        let mut server = mockito::Server::new_async().await;
        let directory = server
            .mock("GET", "/combo_call_new.php")
            .match_query(Matcher::UrlEncoded("sw".into(), "rooms_".into()))
            .with_status(200)
            .with_body(std::fs::read_to_string("./tests/data/buildings.js").unwrap())
            .expect(1)
            .create_async()
            .await;
        let _a = mock_timetable(&mut server, "A").await;
        let _b = mock_timetable(&mut server, "B").await;
        let app = test_app(&server.url());

        let first = app
            .clone()
            .oneshot(get(&format!("/api/rooms?{}", MORNING)))
            .await
            .unwrap();
        let first = body_to_string(first.into_body()).await;

        let second = app
            .oneshot(get(&format!("/api/rooms?{}", MORNING)))
            .await
            .unwrap();
        let second = body_to_string(second.into_body()).await;

        assert_eq!(first, second);
        directory.assert_async().await;
    }

    /// Tests the unprefixed /rooms path still works
    #[tokio::test]
    async fn it_serves_the_legacy_path() {
        let mut server = mockito::Server::new_async().await;
        let _directory = mock_directory(&mut server).await;
        let _a = mock_timetable(&mut server, "A").await;
        let _b = mock_timetable(&mut server, "B").await;
        let app = test_app(&server.url());

        let response = app
            .oneshot(get(&format!("/rooms?{}", MORNING)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = serde_json::from_str(&body_to_string(response.into_body()).await).unwrap();
        assert_eq!(body.as_array().unwrap().len(), 2);
    }
}
