use actix_web::{test, web, App};
use class_timetable::catalog::read_catalog;
use class_timetable::sections::Sections;
use class_timetable::web::{routes, AppState};
use serde_json::{json, Value};

fn state() -> web::Data<AppState> {
    let catalog = read_catalog(include_str!("../data/catalog.csv").as_bytes()).unwrap();
    web::Data::new(AppState::new(Sections::new(catalog, Some(1))))
}

fn physics(start: &str, end: &str) -> Value {
    json!({
        "day": "Monday",
        "start": start,
        "end": end,
        "teacher": "Mr. Okafor",
        "subject": "Physics",
        "room": "Lab 1"
    })
}

#[actix_web::test]
async fn propose_list_and_delete() {
    let app = test::init_service(App::new().app_data(state()).configure(routes)).await;

    let req = test::TestRequest::post()
        .uri("/api/sections/10-A/placements")
        .set_json(physics("09:25", "11:40"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["commit"]["committed_hours"], 3.0);
    let id = body["commit"]["primary"].as_str().unwrap().to_string();

    let req = test::TestRequest::get().uri("/api/sections/10-A/placements").to_request();
    let listed: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(listed[0]["id"], id.as_str());
    assert_eq!(listed[0]["day"], "Mon");
    assert_eq!(listed[0]["range"]["start"], "09:25");
    assert_eq!(listed[0]["assigned_hours"], 3.0);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/sections/10-A/placements/{id}"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let req = test::TestRequest::get().uri("/api/sections/10-A/budget").to_request();
    let budget: Value = test::call_and_read_body_json(&app, req).await;
    let physics = budget
        .as_array()
        .unwrap()
        .iter()
        .find(|e| e["subject"] == "Physics")
        .unwrap();
    assert_eq!(physics["remaining_hours"], 3.0);
}

#[actix_web::test]
async fn rejection_carries_kind_and_message() {
    let app = test::init_service(App::new().app_data(state()).configure(routes)).await;

    let req = test::TestRequest::post()
        .uri("/api/sections/10-A/placements")
        .set_json(physics("09:25", "10:55"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 422);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["kind"], "hour_deficit");
    assert_eq!(body["error"], "Physics still needs 1 more hours");

    let mut unknown_room = physics("09:25", "11:40");
    unknown_room["room"] = json!("Gym");
    let req = test::TestRequest::post()
        .uri("/api/sections/10-A/placements")
        .set_json(unknown_room)
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(body["kind"], "invalid_request");
}

#[actix_web::test]
async fn editing_moves_a_placement_in_place() {
    let app = test::init_service(App::new().app_data(state()).configure(routes)).await;

    let req = test::TestRequest::post()
        .uri("/api/sections/10-A/placements")
        .set_json(physics("09:25", "11:40"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let id = body["commit"]["primary"].as_str().unwrap().to_string();

    let mut moved = physics("07:00", "09:15");
    moved["day"] = json!("Tuesday");
    moved["editing"] = json!(id);
    let req = test::TestRequest::post()
        .uri("/api/sections/10-A/placements")
        .set_json(moved)
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["commit"]["primary"], id.as_str());

    let req = test::TestRequest::get().uri("/api/sections/10-A/placements").to_request();
    let listed: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(listed.as_array().map(Vec::len), Some(1));
    assert_eq!(listed[0]["id"], id.as_str());
    assert_eq!(listed[0]["day"], "Tue");
    assert_eq!(listed[0]["range"]["start"], "07:00");

    let mut malformed = physics("07:00", "09:15");
    malformed["editing"] = json!("not-an-id");
    let req = test::TestRequest::post()
        .uri("/api/sections/10-A/placements")
        .set_json(malformed)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 422);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["kind"], "invalid_request");
    assert_eq!(body["error"], "Invalid placement id: not-an-id");
}

#[actix_web::test]
async fn times_outside_the_grid_are_invalid() {
    let app = test::init_service(App::new().app_data(state()).configure(routes)).await;

    let mut late = physics("21:00", "23:15");
    late["day"] = json!("Sunday");
    let req = test::TestRequest::post()
        .uri("/api/sections/10-A/placements")
        .set_json(late)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 422);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["kind"], "invalid_request");

    let req = test::TestRequest::get().uri("/api/sections/10-A/placements").to_request();
    let listed: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(listed.as_array().map(Vec::len), Some(0));
}

#[actix_web::test]
async fn delete_unknown_placement_is_not_found() {
    let app = test::init_service(App::new().app_data(state()).configure(routes)).await;

    let req = test::TestRequest::delete()
        .uri("/api/sections/10-A/placements/00000000-0000-4000-8000-000000000000")
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status().as_u16(), 404);

    let req = test::TestRequest::delete()
        .uri("/api/sections/10-A/placements/not-an-id")
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status().as_u16(), 400);
}

#[actix_web::test]
async fn grid_and_catalog() {
    let app = test::init_service(App::new().app_data(state()).configure(routes)).await;

    let req = test::TestRequest::get().uri("/api/grid").to_request();
    let grid: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(grid.as_array().map(Vec::len), Some(16));
    assert_eq!(grid[0]["start"], "07:00");

    let req = test::TestRequest::get().uri("/api/catalog").to_request();
    let catalog: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(catalog["subjects"][0]["name"], "Mathematics");
    assert_eq!(catalog["subjects"][0]["weekly_hours"], 6.0);
}
