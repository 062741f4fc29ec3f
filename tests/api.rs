use std::sync::Arc;

use actix_web::{
    cookie::{time::Duration as CookieDuration, Cookie, SameSite},
    dev::ServiceResponse,
    http::{header, StatusCode},
    test, web, App,
};
use serde_json::{json, Value};
use uuid::Uuid;

use wedding_event_service::{
    config::Config,
    db::{memory::MemoryStore, Store},
    handlers,
    service::auth::SessionGate,
    AppState,
};

fn state() -> AppState {
    AppState::new(Arc::new(MemoryStore::default()), Config::development("integration-secret"))
}

macro_rules! app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state.clone()))
                .wrap(SessionGate::new(&$state))
                .configure(handlers::config),
        )
        .await
    };
}

fn token_cookie<B>(resp: &ServiceResponse<B>) -> Cookie<'static> {
    resp.response()
        .cookies()
        .find(|c| c.name() == "token")
        .expect("session cookie")
        .into_owned()
}

macro_rules! signup {
    ($app:expr, $name:expr, $email:expr, $password:expr) => {{
        let req = test::TestRequest::post()
            .uri("/auth/signup")
            .set_json(json!({ "name": $name, "email": $email, "password": $password }))
            .to_request();
        let resp = test::call_service(&$app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let cookie = token_cookie(&resp);
        let body: Value = test::read_body_json(resp).await;
        (body, cookie)
    }};
}

macro_rules! create_event {
    ($app:expr, $cookie:expr) => {{
        let req = test::TestRequest::post()
            .uri("/events")
            .cookie($cookie.clone())
            .set_json(event_body())
            .to_request();
        let resp = test::call_service(&$app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        body
    }};
}

macro_rules! post_status {
    ($app:expr, $cookie:expr, $content:expr) => {{
        let req = test::TestRequest::post()
            .uri("/statuses")
            .cookie($cookie.clone())
            .set_json(json!({ "content": $content }))
            .to_request();
        let resp = test::call_service(&$app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        body
    }};
}

fn event_body() -> Value {
    json!({
        "title": "Anna & Ben",
        "date": "2030-06-01T15:00:00Z",
        "venue": {
            "name": "Old Mill",
            "address": "1 River Rd",
            "mapsLink": "https://maps.example.com/mill"
        },
        "description": "Join us for our wedding",
        "contactInfo": {
            "brideContact": "anna@x.com",
            "groomContact": "ben@x.com",
            "rsvpContact": "rsvp@x.com"
        },
        "schedule": [
            { "time": "15:00", "activity": "Ceremony" },
            { "time": "18:00", "activity": "Dinner" }
        ]
    })
}

fn id_of(body: &Value) -> Uuid {
    body["id"].as_str().unwrap().parse().unwrap()
}

#[actix_web::test]
async fn signup_sets_session_cookie_and_hides_password() {
    let state = state();
    let app = app!(state);
    let (body, cookie) = signup!(app, "Anna", "a@x.com", "secret123");

    let user = &body["user"];
    assert_eq!(user["name"], "Anna");
    assert_eq!(user["email"], "a@x.com");
    assert!(user.get("password").is_none());
    assert!(user.get("passwordHash").is_none());

    assert_eq!(cookie.http_only(), Some(true));
    assert_eq!(cookie.same_site(), Some(SameSite::Strict));
    assert_eq!(cookie.path(), Some("/"));
    assert_eq!(cookie.max_age(), Some(CookieDuration::days(7)));
}

#[actix_web::test]
async fn duplicate_email_is_a_conflict() {
    let state = state();
    let app = app!(state);
    signup!(app, "Anna", "a@x.com", "secret123");

    let req = test::TestRequest::post()
        .uri("/auth/signup")
        .set_json(json!({ "name": "Other", "email": "A@X.com", "password": "another1" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[actix_web::test]
async fn signup_rejects_invalid_payloads() {
    let state = state();
    let app = app!(state);
    let req = test::TestRequest::post()
        .uri("/auth/signup")
        .set_json(json!({ "name": "Anna", "email": "not-an-email", "password": "secret123" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri("/auth/signup")
        .set_json(json!({ "email": "a@x.com" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].is_string());
}

#[actix_web::test]
async fn signin_distinguishes_unknown_user_from_bad_password() {
    let state = state();
    let app = app!(state);
    signup!(app, "Anna", "a@x.com", "secret123");

    let req = test::TestRequest::post()
        .uri("/auth/signin")
        .set_json(json!({ "email": "a@x.com", "password": "wrong-password" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Invalid credentials");

    let req = test::TestRequest::post()
        .uri("/auth/signin")
        .set_json(json!({ "email": "nobody@x.com", "password": "secret123" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn signin_then_check_returns_the_user() {
    let state = state();
    let app = app!(state);
    let (signed_up, _) = signup!(app, "Anna", "a@x.com", "secret123");

    let req = test::TestRequest::post()
        .uri("/auth/signin")
        .set_json(json!({ "email": "a@x.com", "password": "secret123" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let cookie = token_cookie(&resp);

    let req = test::TestRequest::get().uri("/auth/check").cookie(cookie).to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["user"]["id"], signed_up["user"]["id"]);
    assert_eq!(body["user"]["name"], "Anna");
    assert!(body["user"].get("password").is_none());
    assert!(body["user"].get("passwordHash").is_none());
}

#[actix_web::test]
async fn check_without_valid_session_is_null() {
    let state = state();
    let app = app!(state);

    let req = test::TestRequest::get().uri("/auth/check").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert!(body["user"].is_null());

    let req = test::TestRequest::get()
        .uri("/auth/check")
        .cookie(Cookie::new("token", "garbage"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert!(body["user"].is_null());
}

#[actix_web::test]
async fn signout_clears_cookie() {
    let state = state();
    let app = app!(state);
    let (_, cookie) = signup!(app, "Anna", "a@x.com", "secret123");

    let req = test::TestRequest::post().uri("/auth/signout").cookie(cookie).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let cleared = token_cookie(&resp);
    assert_eq!(cleared.value(), "");
    assert_eq!(cleared.max_age(), Some(CookieDuration::ZERO));
}

#[actix_web::test]
async fn gate_redirects_protected_pages_only() {
    let state = state();
    let app = app!(state);

    for page in ["/profile", "/create-event"] {
        let req = test::TestRequest::get().uri(page).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/login");
    }

    let req = test::TestRequest::get()
        .uri(&format!("/events/{}/customize", Uuid::new_v4()))
        .cookie(Cookie::new("token", "tampered.token.value"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);

    let req = test::TestRequest::get().uri(&format!("/events/{}", Uuid::new_v4())).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn anonymous_event_listing_is_public() {
    let state = state();
    let app = app!(state);
    let (_, owner) = signup!(app, "Anna", "a@x.com", "secret123");
    create_event!(app, owner);

    let req = test::TestRequest::get().uri("/events?page=1").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let page: Value = test::read_body_json(resp).await;
    assert_eq!(page["events"].as_array().unwrap().len(), 1);
    assert_eq!(page["hasMore"], false);
}

#[actix_web::test]
async fn anonymous_event_writes_are_unauthorized() {
    let state = state();
    let app = app!(state);

    let req = test::TestRequest::post().uri("/events").set_json(event_body()).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::put()
        .uri(&format!("/events/{}/customize", Uuid::new_v4()))
        .set_json(json!({ "layout": "modern" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Unauthorized");
}

#[actix_web::test]
async fn event_update_without_session_is_unauthorized() {
    let state = state();
    let app = app!(state);
    let req = test::TestRequest::put()
        .uri(&format!("/events/{}", Uuid::new_v4()))
        .set_json(json!({ "title": "Hijacked" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn event_detail_never_exposes_invitation_code() {
    let state = state();
    let app = app!(state);
    let (owner, cookie) = signup!(app, "Anna", "a@x.com", "secret123");
    let created = create_event!(app, cookie);

    assert!(created["invitationCode"].is_string());
    assert_eq!(created["creator"], owner["user"]["id"]);
    let id = id_of(&created);

    let req = test::TestRequest::get().uri(&format!("/events/{id}")).cookie(cookie).to_request();
    let as_creator: Value = test::call_and_read_body_json(&app, req).await;
    assert!(as_creator.get("invitationCode").is_none());
    assert_eq!(as_creator["title"], "Anna & Ben");

    let req = test::TestRequest::get().uri(&format!("/events/{id}")).to_request();
    let as_guest: Value = test::call_and_read_body_json(&app, req).await;
    assert!(as_guest.get("invitationCode").is_none());
    assert_eq!(as_guest["customization"]["layout"], "classic");
}

#[actix_web::test]
async fn non_creator_update_is_forbidden_and_changes_nothing() {
    let state = state();
    let app = app!(state);
    let (_, owner) = signup!(app, "Anna", "a@x.com", "secret123");
    let (_, other) = signup!(app, "Bob", "b@x.com", "secret456");
    let created = create_event!(app, owner);
    let id = id_of(&created);

    let req = test::TestRequest::put()
        .uri(&format!("/events/{id}"))
        .cookie(other.clone())
        .set_json(json!({ "title": "Bob's party" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::put()
        .uri(&format!("/events/{id}/customize"))
        .cookie(other)
        .set_json(json!({ "layout": "rustic" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let stored = state.store.find_event(id).await.unwrap().unwrap();
    assert_eq!(stored.title, "Anna & Ben");
    assert_eq!(stored.customization.layout, Default::default());
}

#[actix_web::test]
async fn update_ignores_creator_and_invitation_code() {
    let state = state();
    let app = app!(state);
    let (owner_body, owner) = signup!(app, "Anna", "a@x.com", "secret123");
    let (other_body, _) = signup!(app, "Bob", "b@x.com", "secret456");
    let created = create_event!(app, owner);
    let id = id_of(&created);
    let code = created["invitationCode"].as_str().unwrap().to_string();

    let req = test::TestRequest::put()
        .uri(&format!("/events/{id}"))
        .cookie(owner)
        .set_json(json!({
            "title": "Anna & Ben, again",
            "creator": other_body["user"]["id"],
            "invitationCode": "STOLEN",
            "id": Uuid::new_v4(),
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["title"], "Anna & Ben, again");
    assert!(body.get("invitationCode").is_none());

    let stored = state.store.find_event(id).await.unwrap().unwrap();
    assert_eq!(stored.id, id);
    assert_eq!(stored.invitation_code, code);
    assert_eq!(stored.creator.to_string(), owner_body["user"]["id"].as_str().unwrap());
}

#[actix_web::test]
async fn creator_can_customize_with_valid_values_only() {
    let state = state();
    let app = app!(state);
    let (_, owner) = signup!(app, "Anna", "a@x.com", "secret123");
    let id = id_of(&create_event!(app, owner));

    let req = test::TestRequest::put()
        .uri(&format!("/events/{id}/customize"))
        .cookie(owner.clone())
        .set_json(json!({ "layout": "modern", "primaryColor": "#112233" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["customization"]["layout"], "modern");
    assert_eq!(body["customization"]["primaryColor"], "#112233");
    assert_eq!(body["customization"]["fontFamily"], "Inter");

    let req = test::TestRequest::put()
        .uri(&format!("/events/{id}/customize"))
        .cookie(owner.clone())
        .set_json(json!({ "primaryColor": "blue" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::put()
        .uri(&format!("/events/{id}/customize"))
        .cookie(owner)
        .set_json(json!({ "layout": "gothic" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn event_list_and_user_events() {
    let state = state();
    let app = app!(state);
    let (owner_body, owner) = signup!(app, "Anna", "a@x.com", "secret123");
    let first = create_event!(app, owner);
    let second = create_event!(app, owner);

    let req = test::TestRequest::get().uri("/events?page=1").cookie(owner).to_request();
    let page: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(page["events"].as_array().unwrap().len(), 2);
    assert_eq!(page["hasMore"], false);
    assert!(page["events"][0].get("invitationCode").is_none());

    let user_id = owner_body["user"]["id"].as_str().unwrap();
    let req = test::TestRequest::get().uri(&format!("/users/{user_id}/events")).to_request();
    let events: Value = test::call_and_read_body_json(&app, req).await;
    let ids: Vec<&Value> = events.as_array().unwrap().iter().map(|e| &e["id"]).collect();
    assert!(ids.contains(&&first["id"]));
    assert!(ids.contains(&&second["id"]));

    let req = test::TestRequest::get().uri(&format!("/users/{user_id}")).to_request();
    let profile: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(profile["createdEvents"].as_array().unwrap().len(), 2);
    assert!(profile.get("passwordHash").is_none());
}

#[actix_web::test]
async fn feed_paginates_newest_first() {
    let state = state();
    let app = app!(state);
    let (_, cookie) = signup!(app, "Anna", "a@x.com", "secret123");
    for i in 0..12 {
        post_status!(app, cookie, format!("status {i}"));
    }

    let req = test::TestRequest::get().uri("/statuses").to_request();
    let first: Value = test::call_and_read_body_json(&app, req).await;
    let statuses = first["statuses"].as_array().unwrap();
    assert_eq!(statuses.len(), 5);
    assert_eq!(statuses[0]["content"], "status 11");
    assert_eq!(statuses[0]["author"]["name"], "Anna");
    assert_eq!(first["hasMore"], true);

    let req = test::TestRequest::get().uri("/statuses?page=3").to_request();
    let last: Value = test::call_and_read_body_json(&app, req).await;
    let statuses = last["statuses"].as_array().unwrap();
    assert_eq!(statuses.len(), 2);
    assert_eq!(statuses[1]["content"], "status 0");
    assert_eq!(last["hasMore"], false);

    let req = test::TestRequest::get().uri("/statuses?page=4").to_request();
    let beyond: Value = test::call_and_read_body_json(&app, req).await;
    assert!(beyond["statuses"].as_array().unwrap().is_empty());
    assert_eq!(beyond["hasMore"], false);

    for bad in ["/statuses?page=0", "/statuses?page=abc"] {
        let req = test::TestRequest::get().uri(bad).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}

#[actix_web::test]
async fn status_author_comes_from_session() {
    let state = state();
    let app = app!(state);
    let (anna, cookie) = signup!(app, "Anna", "a@x.com", "secret123");

    let req = test::TestRequest::post()
        .uri("/statuses")
        .cookie(cookie)
        .set_json(json!({ "content": "hello", "author": Uuid::new_v4(), "images": ["https://img.example.com/1.jpg"] }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["author"]["id"], anna["user"]["id"]);
    assert_eq!(body["author"]["email"], "a@x.com");
    assert_eq!(body["images"][0], "https://img.example.com/1.jpg");

    let req = test::TestRequest::post()
        .uri("/statuses")
        .set_json(json!({ "content": "anonymous" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn like_is_a_toggle() {
    let state = state();
    let app = app!(state);
    let (_, author) = signup!(app, "Anna", "a@x.com", "secret123");
    let (fan_body, fan) = signup!(app, "Bob", "b@x.com", "secret456");
    let status = post_status!(app, author, "we're engaged");
    let id = id_of(&status);

    let like = |cookie: Cookie<'static>| {
        test::TestRequest::post()
            .uri(&format!("/statuses/{id}/like"))
            .cookie(cookie)
            .to_request()
    };

    let liked: Value = test::call_and_read_body_json(&app, like(fan.clone())).await;
    assert_eq!(liked["likes"], json!([fan_body["user"]["id"]]));

    let unliked: Value = test::call_and_read_body_json(&app, like(fan)).await;
    assert_eq!(unliked["likes"], json!([]));

    let req = test::TestRequest::post().uri(&format!("/statuses/{id}/like")).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::post()
        .uri(&format!("/statuses/{}/like", Uuid::new_v4()))
        .cookie(author)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn comments_append_in_order_with_resolved_authors() {
    let state = state();
    let app = app!(state);
    let (_, anna) = signup!(app, "Anna", "a@x.com", "secret123");
    let (_, bob) = signup!(app, "Bob", "b@x.com", "secret456");
    let id = id_of(&post_status!(app, anna, "save the date"));

    for (cookie, text) in [(bob.clone(), "congrats!"), (anna.clone(), "thank you"), (bob, "see you there")] {
        let req = test::TestRequest::post()
            .uri(&format!("/statuses/{id}/comment"))
            .cookie(cookie)
            .set_json(json!({ "content": text }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let req = test::TestRequest::post()
        .uri(&format!("/statuses/{id}/like"))
        .cookie(anna.clone())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let comments = body["comments"].as_array().unwrap();
    let texts: Vec<&str> = comments.iter().map(|c| c["content"].as_str().unwrap()).collect();
    assert_eq!(texts, vec!["congrats!", "thank you", "see you there"]);
    assert_eq!(comments[0]["author"]["name"], "Bob");
    assert_eq!(comments[1]["author"]["name"], "Anna");
    assert_eq!(body["author"]["name"], "Anna");

    let req = test::TestRequest::post()
        .uri(&format!("/statuses/{id}/comment"))
        .cookie(anna)
        .set_json(json!({ "content": "   " }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn profile_edit_is_owner_only() {
    let state = state();
    let app = app!(state);
    let (anna, anna_cookie) = signup!(app, "Anna", "a@x.com", "secret123");
    let (_, bob_cookie) = signup!(app, "Bob", "b@x.com", "secret456");
    let anna_id = anna["user"]["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::put()
        .uri(&format!("/users/{anna_id}"))
        .cookie(bob_cookie)
        .set_json(json!({ "bio": "hacked" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::put()
        .uri(&format!("/users/{anna_id}"))
        .cookie(anna_cookie)
        .set_json(json!({ "bio": "Bride to be", "profilePhoto": "https://img.example.com/a.jpg" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["bio"], "Bride to be");
    assert_eq!(body["name"], "Anna");

    let req = test::TestRequest::get().uri("/users").to_request();
    let users: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(users.as_array().unwrap().len(), 2);
    assert!(users[0].get("passwordHash").is_none());

    let req = test::TestRequest::get().uri(&format!("/users/{}", Uuid::new_v4())).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
