use actix_web::http::header;
use actix_web::{get, middleware, post, web, App, HttpRequest, HttpResponse, HttpServer, Responder};
use anyhow::Context;
use clap::Parser;

use serde::Deserialize;
use trigram_core::{Error, Model};

mod config;

use config::Config;

/// Smallest `length` honored by `/generate`.
const MIN_LENGTH: usize = 2;

/// Struct representing query parameters for the `/generate` endpoint
#[derive(Deserialize)]
struct GenerateParams {
	start: Option<String>,
	length: Option<String>,
}

#[derive(Deserialize)]
struct LookupParams {
	prefix: Option<String>,
}

struct SharedData {
	model: Model,
	keep: String,
	default_length: usize,
	max_length: usize,
}

impl GenerateParams {
	/// Requested length: the default when missing or not a number,
	/// kept within `MIN_LENGTH..=max_length`.
	fn length(&self, default_length: usize, max_length: usize) -> usize {
		let length = match self.length.as_deref().map(|s| s.trim().parse::<i64>()) {
			Some(Ok(length)) if length < MIN_LENGTH as i64 => MIN_LENGTH,
			Some(Ok(length)) => usize::try_from(length).unwrap_or(max_length),
			_ => default_length,
		};
		length.clamp(MIN_LENGTH, max_length.max(MIN_LENGTH))
	}
}

fn is_plain_text(req: &HttpRequest) -> bool {
	req.headers()
		.get(header::CONTENT_TYPE)
		.and_then(|value| value.to_str().ok())
		.and_then(|value| value.split(';').next())
		.is_some_and(|mime| mime.trim().eq_ignore_ascii_case("text/plain"))
}

/// Maps a core error to a response.
fn error_response(e: &Error) -> HttpResponse {
	match e {
		Error::NoData => HttpResponse::NotFound().body("no data\n"),
		Error::InvalidSeed { .. } | Error::Arity { .. } | Error::Io(_) => {
			HttpResponse::BadRequest().body(format!("{e}\n"))
		}
		Error::InvalidOrder(_) | Error::LockPoisoned => HttpResponse::InternalServerError().body(format!("{e}\n")),
	}
}

/// HTTP POST endpoint `/learn`
///
/// Learns a `text/plain` body and answers with the number of n-grams added.
#[post("/learn")]
async fn post_learn(data: web::Data<SharedData>, req: HttpRequest, body: web::Bytes) -> impl Responder {
	if !is_plain_text(&req) {
		return HttpResponse::BadRequest().body("expected text/plain\n");
	}

	let shared_data = data.clone();
	let learned = web::block(move || shared_data.model.learn_text(&body[..], &shared_data.keep)).await;

	match learned {
		Ok(Ok(n)) => {
			log::info!("learned {n} n-grams");
			HttpResponse::Ok().body(format!("{n}\n"))
		}
		Ok(Err(e)) => {
			log::warn!("{e}");
			error_response(&e.source)
		}
		Err(e) => {
			log::error!("learn task failed: {e}");
			HttpResponse::InternalServerError().finish()
		}
	}
}

/// HTTP GET endpoint `/generate`
///
/// Generates text from `start` (or a random prefix) for up to `length` words.
#[get("/generate")]
async fn get_generated(data: web::Data<SharedData>, query: web::Query<GenerateParams>) -> impl Responder {
	let length = query.length(data.default_length, data.max_length);
	let start = query.into_inner().start.unwrap_or_default();

	let shared_data = data.clone();
	let seed = start.clone();
	let generated = web::block(move || shared_data.model.generate(&seed, length)).await;

	match generated {
		Ok(Ok(text)) => HttpResponse::Ok().body(format!("{text}\n")),
		Ok(Err(e)) => {
			log::debug!("generate from {start:?} failed: {e}");
			error_response(&e)
		}
		Err(e) => {
			log::error!("generate task failed: {e}");
			HttpResponse::InternalServerError().finish()
		}
	}
}

#[get("/stats")]
async fn get_stats(data: web::Data<SharedData>) -> impl Responder {
	match data.model.stats() {
		Ok(stats) => HttpResponse::Ok().body(format!(
			"prefixes: {}, endings: {}, ratio: {:.6}\n",
			stats.prefixes,
			stats.continuations,
			stats.ratio()
		)),
		Err(e) => error_response(&e),
	}
}

#[get("/grams")]
async fn get_grams(data: web::Data<SharedData>) -> impl Responder {
	match data.model.grams() {
		Ok(grams) => HttpResponse::Ok().json(grams),
		Err(e) => error_response(&e),
	}
}

#[get("/lookup")]
async fn get_lookup(data: web::Data<SharedData>, query: web::Query<LookupParams>) -> impl Responder {
	let prefix = match &query.prefix {
		Some(s) if !s.trim().is_empty() => s,
		_ => return HttpResponse::BadRequest().body("missing or empty prefix\n"),
	};

	match data.model.lookup(prefix) {
		Ok(continuations) => HttpResponse::Ok().json(continuations),
		Err(e) => error_response(&e),
	}
}

fn configure(cfg: &mut web::ServiceConfig) {
	cfg.service(post_learn)
		.service(get_generated)
		.service(get_stats)
		.service(get_grams)
		.service(get_lookup);
}

/// Main entry point for the server.
///
/// Builds the model, learns the startup corpus if any, and serves it.
#[actix_web::main]
async fn main() -> anyhow::Result<()> {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

	let config = Config::parse();
	let model = Model::try_new(config.order)?;

	for path in &config.corpus {
		let n = model
			.learn_file(path, &config.keep)
			.with_context(|| format!("failed to learn {}", path.display()))?;
		log::info!("learned {n} n-grams from {}", path.display());
	}

	let workers = config.workers();
	let max_body = config.max_body;
	log::info!(
		"trigram: http://{}/ (order {}, keep {:?}, max length {}, {} workers)",
		config.bind,
		config.order,
		config.keep,
		config.max_length,
		workers
	);

	let shared_data = web::Data::new(SharedData {
		model,
		keep: config.keep,
		default_length: config.default_length,
		max_length: config.max_length,
	});

	HttpServer::new(move || {
		App::new()
			.wrap(middleware::Logger::default())
			.app_data(shared_data.clone())
			.app_data(web::PayloadConfig::new(max_body))
			.configure(configure)
	})
		.workers(workers)
		.bind(&config.bind)
		.with_context(|| format!("failed to bind {}", config.bind))?
		.run()
		.await?;

	Ok(())
}
