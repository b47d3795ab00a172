use actix_web::{
    HttpResponse, delete, get, patch, post,
    web::{Data, Path, Query, ServiceConfig, scope},
};
use actix_web_validator::Json;

use crate::db::partial_update::FieldUpdateMap;
use super::dto::{DeletedResponse, JobResponse, JobsResponse};
use super::models::{JobFilter, JobQuery, JobUpdate, NewJob};
use super::service::{JobService, ServiceError};

/// POST /jobs { company_handle, title, salary, equity } => 201 { job }
#[post("")]
async fn create_job(
    service: Data<JobService>,
    job: Json<NewJob>,
) -> Result<HttpResponse, ServiceError> {
    let job = service.create_job(&job).await?;
    Ok(HttpResponse::Created().json(JobResponse { job }))
}

/// GET /jobs?title=&minSalary=&hasEquity= => { jobs }
#[get("")]
async fn list_jobs(
    service: Data<JobService>,
    query: Query<JobQuery>,
) -> Result<HttpResponse, ServiceError> {
    let filter = JobFilter::from(query.into_inner());
    let jobs = service.list_jobs(&filter).await?;
    Ok(HttpResponse::Ok().json(JobsResponse { jobs }))
}

/// GET /jobs/{handle} => { jobs } owned by the company
#[get("/{handle}")]
async fn company_jobs(
    service: Data<JobService>,
    handle: Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let jobs = service.company_jobs(&handle).await?;
    Ok(HttpResponse::Ok().json(JobsResponse { jobs }))
}

/// PATCH /jobs/{id} { title?, salary?, equity? } => { job }
#[patch("/{id}")]
async fn update_job(
    service: Data<JobService>,
    id: Path<i32>,
    update: Json<JobUpdate>,
) -> Result<HttpResponse, ServiceError> {
    let updates = FieldUpdateMap::from(update.into_inner());
    let job = service.update_job(id.into_inner(), &updates).await?;
    Ok(HttpResponse::Ok().json(JobResponse { job }))
}

/// DELETE /jobs/{id} => { deleted: id }
#[delete("/{id}")]
async fn delete_job(
    service: Data<JobService>,
    id: Path<i32>,
) -> Result<HttpResponse, ServiceError> {
    let id = id.into_inner();
    service.remove_job(id).await?;
    Ok(HttpResponse::Ok().json(DeletedResponse { deleted: id }))
}

pub fn job_config(config: &mut ServiceConfig) {
    config.service(
        scope("jobs")
            .service(create_job)
            .service(list_jobs)
            .service(company_jobs)
            .service(update_job)
            .service(delete_job),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::validation;
    use crate::db::memory::MemoryJobStore;
    use actix_web::{App, http::StatusCode, test};
    use serde_json::{Value, json};
    use std::sync::Arc;

    fn seeded_service() -> Data<JobService> {
        let seed = |title: &str, salary: i32, equity: &str, company: &str| NewJob {
            company_handle: company.to_string(),
            title: title.to_string(),
            salary: Some(salary),
            equity: Some(equity.to_string()),
        };
        let store = MemoryJobStore::with_jobs(vec![
            seed("engineer", 80000, "0", "c1"),
            seed("doctor", 100000, "0.07", "c2"),
            seed("lawyer", 120000, "0.893", "c3"),
        ]);
        Data::new(JobService::new(Arc::new(store)))
    }

    macro_rules! init_app {
        () => {
            test::init_service(
                App::new()
                    .app_data(seeded_service())
                    .app_data(validation::json_config())
                    .app_data(validation::query_config())
                    .configure(job_config),
            )
            .await
        };
    }

    fn titles(body: &Value) -> Vec<&str> {
        body["jobs"]
            .as_array()
            .map(|jobs| jobs.iter().filter_map(|j| j["title"].as_str()).collect())
            .unwrap_or_default()
    }

    #[actix_web::test]
    async fn create_returns_201_with_stored_job() {
        let app = init_app!();
        let req = test::TestRequest::post()
            .uri("/jobs")
            .set_json(json!({
                "title": "author",
                "salary": 75000,
                "equity": "0.56",
                "company_handle": "c1"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(
            body["job"],
            json!({
                "id": 4,
                "title": "author",
                "salary": 75000,
                "equity": "0.56",
                "company_handle": "c1"
            })
        );
    }

    #[actix_web::test]
    async fn create_duplicate_title_is_conflict() {
        let app = init_app!();
        let req = test::TestRequest::post()
            .uri("/jobs")
            .set_json(json!({ "title": "doctor", "company_handle": "c1" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);
    }

    #[actix_web::test]
    async fn create_rejects_out_of_range_equity() {
        let app = init_app!();
        let req = test::TestRequest::post()
            .uri("/jobs")
            .set_json(json!({ "title": "pilot", "equity": "1.5", "company_handle": "c1" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn list_applies_query_filters() {
        let app = init_app!();

        let req = test::TestRequest::get().uri("/jobs?minSalary=90000").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(titles(&body), vec!["doctor", "lawyer"]);

        let req = test::TestRequest::get().uri("/jobs?title=eng").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(titles(&body), vec!["engineer"]);

        let req = test::TestRequest::get().uri("/jobs?hasEquity=true").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(titles(&body), vec!["doctor", "lawyer"]);

        let req = test::TestRequest::get().uri("/jobs?hasEquity=false").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(titles(&body), vec!["engineer", "doctor", "lawyer"]);
    }

    #[actix_web::test]
    async fn list_rejects_non_boolean_has_equity() {
        let app = init_app!();
        let req = test::TestRequest::get().uri("/jobs?hasEquity=yes").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn company_jobs_lists_jobs_or_404() {
        let app = init_app!();

        let req = test::TestRequest::get().uri("/jobs/c2").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(titles(&body), vec!["doctor"]);

        let req = test::TestRequest::get().uri("/jobs/nope").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn patch_updates_supplied_fields() {
        let app = init_app!();
        let req = test::TestRequest::patch()
            .uri("/jobs/1")
            .set_json(json!({ "salary": 280000, "equity": null }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["job"]["title"], "engineer");
        assert_eq!(body["job"]["salary"], 280000);
        assert_eq!(body["job"]["equity"], Value::Null);
    }

    #[actix_web::test]
    async fn patch_with_empty_body_is_bad_request() {
        let app = init_app!();
        let req = test::TestRequest::patch()
            .uri("/jobs/999999")
            .set_json(json!({}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn patch_rejects_company_handle() {
        let app = init_app!();
        let req = test::TestRequest::patch()
            .uri("/jobs/1")
            .set_json(json!({ "company_handle": "c2" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn patch_missing_job_is_not_found() {
        let app = init_app!();
        let req = test::TestRequest::patch()
            .uri("/jobs/999999")
            .set_json(json!({ "title": "ghost" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn delete_returns_id_then_404() {
        let app = init_app!();

        let req = test::TestRequest::delete().uri("/jobs/2").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, json!({ "deleted": 2 }));

        let req = test::TestRequest::delete().uri("/jobs/2").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
