use axum::response::Html;

const INDEX: &str = r#"<html>
<head><title>Hawaii Climate API</title></head>
<body>
<h1>Hawaii Climate API</h1>
<p>Precipitation for the last 12 months of data, keyed by date:</p>
<ul>
  <li><a href="/api/v1.0/precipitation">/api/v1.0/precipitation</a></li>
</ul>
<p>Weather stations:</p>
<ul>
  <li><a href="/api/v1.0/stations">/api/v1.0/stations</a></li>
</ul>
<p>Temperature observations for the last 12 months of data:</p>
<ul>
  <li><a href="/api/v1.0/tobs">/api/v1.0/tobs</a></li>
</ul>
<p>Daily min, avg and max temperature from a start date (YYYY-MM-DD):</p>
<ul>
  <li><a href="/api/v1.0/2017-03-14">/api/v1.0/2017-03-14</a></li>
</ul>
<p>Daily min, avg and max temperature between a start and end date, inclusive:</p>
<ul>
  <li><a href="/api/v1.0/2017-03-14/2017-03-28">/api/v1.0/2017-03-14/2017-03-28</a></li>
</ul>
<p>API reference: <a href="/docs">/docs</a></p>
</body>
</html>
"#;

pub async fn index_handler() -> Html<&'static str> {
    Html(INDEX)
}
