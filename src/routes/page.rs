//! The single-page UI.
//!
//! Map rendering is done in the browser by Leaflet and the side-by-side
//! plugin; the page only feeds them what the JSON API returns.

use actix_web::{HttpResponse, Responder};

pub const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Comparing Global Land Cover Maps</title>
<meta name="viewport" content="width=device-width, initial-scale=1">
<link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css">
<script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
<script src="https://unpkg.com/leaflet-side-by-side@2.2.0/leaflet-side-by-side.min.js"></script>
<script src="https://cdn.jsdelivr.net/npm/marked/marked.min.js"></script>
<script src="https://cdn.jsdelivr.net/npm/dompurify@3.1.6/dist/purify.min.js"></script>
<style>
body { font-family: -apple-system, 'Segoe UI', Roboto, sans-serif; margin: 0; padding: 16px 24px; }
#query { width: 100%; padding: 8px; font-size: 1rem; box-sizing: border-box; }
#analysis { margin: 16px 0; }
.warning { background: #fff4d6; border-left: 4px solid #eab308; padding: 6px 10px; margin: 6px 0; }
.error { background: #fde2e2; border-left: 4px solid #ef4444; padding: 6px 10px; margin: 6px 0; }
.columns { display: flex; gap: 16px; }
#map { flex: 4; height: 750px; }
#controls { flex: 1; display: flex; flex-direction: column; gap: 8px; }
#controls label { display: flex; flex-direction: column; font-size: 0.9rem; }
.legend { background: white; padding: 6px 8px; line-height: 18px; font-size: 12px; }
.legend i { width: 14px; height: 14px; float: left; margin-right: 6px; }
</style>
</head>
<body>
<h1>Comparing Global Land Cover Maps</h1>
<form id="query-form"><input id="query" placeholder="Enter your query:" autocomplete="off"></form>
<div id="messages"></div>
<div id="analysis"></div>
<div class="columns" id="workspace" hidden>
  <div id="map"></div>
  <div id="controls">
    <label>Longitude <input id="longitude" type="number" min="-180" max="180" step="0.0001"></label>
    <label>Latitude <input id="latitude" type="number" min="-90" max="90" step="0.0001"></label>
    <label>Zoom <input id="zoom" type="number" min="0" max="20" step="1"></label>
    <label>Start Date for Dynamic World <input id="start_date" type="date"></label>
    <label>End Date for Dynamic World <input id="end_date" type="date"></label>
    <label>Select a left layer <select id="left"></select></label>
    <label>Select a right layer <select id="right"></select></label>
    <label>Select a legend <select id="legend"></select></label>
  </div>
</div>
<script>
const api = (path, body) => fetch('/api/v1' + path, {
  method: 'POST', headers: {'Content-Type': 'application/json'}, body: JSON.stringify(body)
}).then(async r => ({ok: r.ok, body: await r.json()}));

let map, splitControl, legendControl, leftLayer, rightLayer;

function showMessages(warnings, error) {
  const box = document.getElementById('messages');
  box.innerHTML = '';
  (warnings || []).forEach(w => { const d = document.createElement('div'); d.className = 'warning'; d.textContent = w; box.appendChild(d); });
  if (error) { const d = document.createElement('div'); d.className = 'error'; d.textContent = error; box.appendChild(d); }
}

function fillSelect(id, options, value) {
  const select = document.getElementById(id);
  select.innerHTML = '';
  options.forEach(o => { const opt = document.createElement('option'); opt.value = o; opt.textContent = o; select.appendChild(opt); });
  select.value = value;
}

function setInputs(attrs) {
  ['longitude', 'latitude', 'zoom', 'start_date', 'end_date'].forEach(k => document.getElementById(k).value = attrs[k]);
}

function renderView(view) {
  document.getElementById('workspace').hidden = false;
  if (!map) {
    map = L.map('map');
    const basemaps = {};
    view.basemaps.forEach(b => {
      basemaps[b.name] = b.kind === 'wms'
        ? L.tileLayer.wms(b.url, {layers: b.wms_layer, attribution: b.attribution})
        : L.tileLayer(b.url, {attribution: b.attribution});
    });
    basemaps['HYBRID'].addTo(map);
    L.control.layers(basemaps).addTo(map);
  }
  map.setView([view.center.latitude, view.center.longitude], view.zoom);
  [leftLayer, rightLayer].forEach(l => l && map.removeLayer(l));
  if (splitControl) splitControl.remove();
  leftLayer = L.tileLayer(view.left.urlTemplate, {attribution: view.left.attribution}).addTo(map);
  rightLayer = L.tileLayer(view.right.urlTemplate, {attribution: view.right.attribution}).addTo(map);
  splitControl = L.control.sideBySide(leftLayer, rightLayer).addTo(map);

  if (legendControl) legendControl.remove();
  legendControl = L.control({position: 'bottomright'});
  legendControl.onAdd = () => {
    const div = L.DomUtil.create('div', 'legend');
    div.innerHTML = '<strong>' + view.legend.title + '</strong><br>' +
      view.legend.entries.map(e => '<i style="background:' + e.color + '"></i>' + e.label).join('<br>');
    return div;
  };
  legendControl.addTo(map);

  fillSelect('left', view.options, view.left.layer);
  fillSelect('right', view.options, view.right.layer);
  fillSelect('legend', view.options, view.legendLayer);
}

document.getElementById('query-form').addEventListener('submit', async ev => {
  ev.preventDefault();
  const query = document.getElementById('query').value.trim();
  if (!query) return;
  document.getElementById('analysis').textContent = 'Analyzing...';
  const {ok, body} = await api('/analyze', {query});
  if (!ok) { showMessages([], body.message); return; }
  document.getElementById('analysis').innerHTML = body.analysis ? DOMPurify.sanitize(marked.parse(body.analysis)) : '';
  showMessages(body.warnings, body.extraction_error);
  if (body.attributes) setInputs(body.attributes);
  if (body.view) renderView(body.view);
});

document.getElementById('controls').addEventListener('change', async () => {
  const value = id => document.getElementById(id).value;
  const {ok, body} = await api('/view', {
    longitude: parseFloat(value('longitude')), latitude: parseFloat(value('latitude')),
    zoom: parseInt(value('zoom'), 10), start_date: value('start_date'), end_date: value('end_date'),
    left: value('left'), right: value('right'), legend: value('legend')
  });
  if (!ok) { showMessages([], body.message); return; }
  showMessages(body.warnings);
  renderView(body);
});
</script>
</body>
</html>
"##;

/// Serve the single page
pub async fn index() -> impl Responder {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(INDEX_HTML)
}
