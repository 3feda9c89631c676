use axum::response::Html;

const HOME_PAGE: &str = r#"<!doctype html>
<html lang="en">
<head><meta charset="utf-8"><title>Pharmacy Locator</title></head>
<body>
<h1>Pharmacy Locator</h1>
<p>Find which pharmacies have a medicine in stock.</p>
<form action="/medicine/search/" method="get">
  <input type="search" name="name" placeholder="Medicine name" required>
  <button type="submit">Search</button>
</form>
<ul>
  <li><a href="/api/medicines/">Medicines</a></li>
  <li><a href="/api/pharmacies/">Pharmacies</a></li>
  <li><a href="/api/inventory/">Inventory</a></li>
</ul>
</body>
</html>
"#;

pub async fn home() -> Html<&'static str> {
    Html(HOME_PAGE)
}
