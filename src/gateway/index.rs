//! `GET /`: the HTML route index.

use axum::{
    http::{header, StatusCode},
    response::IntoResponse,
};

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>Hawaii Weather API</title></head>
<body style="font-family:sans-serif">
<h2>Available Hawaii Weather API Routes for JSON Data:</h2>
<ul>
<li>Last 12 months of precipitation data: <a href="/api/v1.0/precipitation">/api/v1.0/precipitation</a></li>
<li>Observation stations: <a href="/api/v1.0/stations">/api/v1.0/stations</a></li>
<li>Last 12 months of temperature observations from the most active station: <a href="/api/v1.0/tobs">/api/v1.0/tobs</a></li>
</ul>
<ul>
<li>Minimum, average and maximum temperature over a date range: /api/v1.0/<strong>[start]</strong>/<strong>[end]</strong></li>
</ul>
<p><small><strong>Note:</strong> replace <strong>[start]</strong> and <strong>[end]</strong> with dates formatted as <strong>YYYY-MM-DD</strong>.
<em>Example:</em> <a href="/api/v1.0/2016-08-23/2017-08-23">/api/v1.0/2016-08-23/2017-08-23</a>.<br>
Dates outside the dataset fall back to the earliest and latest dates in the data.<br>
<em>If only a start date is given, the range runs through the latest record in the dataset.</em></small></p>
</body>
</html>
"#;

pub async fn handle_index() -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
        INDEX_HTML,
    )
}
