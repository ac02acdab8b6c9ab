//! Embedded HTML/CSS/JS frontend for the sentiment dashboard.
//!
//! The entire SPA is compiled into the binary as a string constant.
//! No external assets, no build tools, no CDN dependencies. All state lives
//! on the server; the page only renders what `/api/*` returns.

/// The complete single-page dashboard HTML.
pub const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Sentiment Insights</title>
<style>
/* palette */
:root {
  --page: #0f141a;
  --panel: #171d25;
  --line: #2c343f;
  --ink: #e4e9ef;
  --ink-dim: #8d97a3;
  --link: #4f9ff0;
  --pos: #43b65a;
  --neg: #ec5b52;
  --neu: #8d97a3;
  --round: 10px;
  --sans: system-ui, -apple-system, 'Segoe UI', Roboto, sans-serif;
  --fixed: ui-monospace, 'SF Mono', Menlo, monospace;
}

*, *::before, *::after { box-sizing: border-box; margin: 0; padding: 0; }
body { background: var(--page); color: var(--ink); font: 14px/1.5 var(--sans); }

.app { max-width: 1180px; margin: 0 auto; padding: 28px 24px; }
header { display: flex; justify-content: space-between; align-items: flex-end; gap: 16px; margin-bottom: 24px; }
header h1 { font-size: 22px; font-weight: 650; }
header .subtitle { color: var(--ink-dim); font-size: 13px; }

.badge { font-size: 12px; padding: 3px 10px; border-radius: 999px; border: 1px solid var(--line); color: var(--ink-dim); }
.badge.ok { color: var(--pos); border-color: var(--pos); }
.badge.err { color: var(--neg); border-color: var(--neg); }

.columns { display: grid; grid-template-columns: minmax(0, 3fr) minmax(0, 2fr); gap: 18px; }
@media (max-width: 880px) { .columns { grid-template-columns: minmax(0, 1fr); } }

.card { position: relative; background: var(--panel); border: 1px solid var(--line); border-radius: var(--round); padding: 18px 20px; margin-bottom: 18px; }
.card h2 { font-size: 15px; font-weight: 600; margin-bottom: 14px; }
.card h3 { font-size: 12px; font-weight: 600; text-transform: uppercase; letter-spacing: .04em; color: var(--ink-dim); margin-bottom: 8px; }

/* analyzer */
textarea { display: block; width: 100%; min-height: 170px; resize: vertical; padding: 12px; font: inherit; color: var(--ink); background: var(--page); border: 1px solid var(--line); border-radius: 6px; }
textarea:focus { outline: 2px solid var(--link); outline-offset: -1px; }
.counter { margin: 6px 0 14px; text-align: right; font: 12px var(--fixed); color: var(--ink-dim); }
.samples { display: flex; flex-wrap: wrap; gap: 6px; margin-bottom: 18px; }
.samples button { font-size: 12px; padding: 3px 10px; }
.actions { display: flex; gap: 8px; justify-content: flex-end; }

button { font: 500 13px var(--sans); color: var(--ink); background: none; border: 1px solid var(--line); border-radius: 6px; padding: 7px 15px; cursor: pointer; }
button:hover:not(:disabled) { border-color: var(--ink-dim); }
button:disabled { cursor: default; opacity: .45; }
button.primary { color: #fff; background: var(--link); border-color: var(--link); }

.overlay { position: absolute; inset: 0; display: none; flex-direction: column; justify-content: center; align-items: center; gap: 10px; border-radius: var(--round); background: rgba(15, 20, 26, .95); }
.overlay.show { display: flex; }
.overlay .sentiment { font-size: 34px; font-weight: 700; }
.overlay .confidence { color: var(--ink-dim); font-family: var(--fixed); }

.Positive { color: var(--pos); }
.Negative { color: var(--neg); }
.Neutral { color: var(--neu); }

/* dashboard */
.stats-grid { display: grid; grid-template-columns: repeat(2, minmax(0, 1fr)); gap: 18px; margin-bottom: 18px; }
.stat-card { padding: 18px; text-align: center; background: var(--panel); border: 1px solid var(--line); border-radius: var(--round); }
.stat-card .value { font: 700 30px/1.1 var(--fixed); color: var(--link); }
.stat-card .label { margin-top: 4px; font-size: 12px; color: var(--ink-dim); }

.donut-wrap { display: flex; align-items: center; gap: 22px; }
.donut { flex: none; width: 136px; height: 136px; border-radius: 50%; mask: radial-gradient(circle, transparent 41%, #000 42%); -webkit-mask: radial-gradient(circle, transparent 41%, #000 42%); }
.legend { list-style: none; font-size: 13px; }
.legend li { display: flex; align-items: center; gap: 8px; padding: 2px 0; }
.legend .dot { width: 9px; height: 9px; border-radius: 50%; }
.empty { padding: 22px 0; text-align: center; color: var(--ink-dim); }

.history { list-style: none; max-height: 340px; overflow-y: auto; }
.history li { display: flex; justify-content: space-between; gap: 12px; padding: 7px 0; border-top: 1px solid var(--line); }
.history li:first-child { border-top: 0; }
.history .text { min-width: 0; overflow: hidden; white-space: nowrap; text-overflow: ellipsis; color: var(--ink-dim); }
.history .tag { flex: none; font: 600 12px var(--fixed); }

.toast { position: fixed; right: 24px; bottom: 24px; max-width: 360px; padding: 12px 16px; background: var(--panel); border: 1px solid var(--line); border-radius: var(--round); opacity: 0; translate: 0 8px; transition: opacity .2s, translate .2s; pointer-events: none; }
.toast.show { opacity: 1; translate: 0 0; }
.toast.error { border-left: 3px solid var(--neg); }
.toast .title { font-weight: 600; }
</style>
</head>
<body>
<div class="app">
  <header>
    <div>
      <h1>Sentiment Insights</h1>
      <div class="subtitle">Customer review sentiment analysis</div>
    </div>
    <span class="badge" id="health-badge">checking…</span>
  </header>

  <div class="columns">
    <section>
      <div class="card" id="analyzer-card">
        <h2>Analyze a Review</h2>
        <textarea id="review" maxlength="2000" placeholder="Paste or type a customer review…"></textarea>
        <div class="counter"><span id="count">0</span> / 2000</div>
        <h3>Try a sample</h3>
        <div class="samples" id="samples"></div>
        <div class="actions">
          <button id="clear-btn">Clear</button>
          <button class="primary" id="analyze-btn">Analyze</button>
        </div>

        <div class="overlay" id="overlay">
          <div class="sentiment" id="result-sentiment"></div>
          <div class="confidence">Confidence: <span id="result-confidence"></span></div>
          <button class="primary" id="again-btn">Analyze Another</button>
        </div>
      </div>
    </section>

    <section>
      <div class="stats-grid">
        <div class="stat-card">
          <div class="value" id="stat-total">0</div>
          <div class="label">Total</div>
        </div>
        <div class="stat-card">
          <div class="value" id="stat-avg">0%</div>
          <div class="label">Avg. Conf.</div>
        </div>
      </div>

      <div class="card">
        <h2>Sentiment Ratio</h2>
        <div id="ratio"></div>
      </div>

      <div class="card">
        <h2>Recent History</h2>
        <ul class="history" id="history"></ul>
      </div>
    </section>
  </div>
</div>

<div class="toast" id="toast"><div class="title"></div><div class="msg"></div></div>

<script>
// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------
const COLORS = { Positive: 'var(--pos)', Negative: 'var(--neg)', Neutral: 'var(--neu)' };
let loading = false;

// ---------------------------------------------------------------------------
// API helpers
// ---------------------------------------------------------------------------
async function api(method, path, body) {
  const opts = { method, headers: {} };
  if (body) {
    opts.headers['Content-Type'] = 'application/json';
    opts.body = JSON.stringify(body);
  }
  const res = await fetch(path, opts);
  return { status: res.status, data: await res.json() };
}

function toast(title, msg, isError) {
  const el = document.getElementById('toast');
  el.querySelector('.title').textContent = title;
  el.querySelector('.msg').textContent = msg;
  el.className = 'toast show' + (isError ? ' error' : '');
  setTimeout(() => el.className = 'toast', 4000);
}

// Safe for element content and quoted attribute values.
function esc(s) {
  if (s == null) return '';
  return String(s)
    .replace(/&/g, '&amp;')
    .replace(/</g, '&lt;')
    .replace(/>/g, '&gt;')
    .replace(/"/g, '&quot;')
    .replace(/'/g, '&#39;');
}

// Unicode scalar count, matching the server's limit.
function charCount(s) {
  return [...s].length;
}

// ---------------------------------------------------------------------------
// Analyzer
// ---------------------------------------------------------------------------
const review = document.getElementById('review');

function updateControls() {
  document.getElementById('count').textContent = charCount(review.value);
  document.getElementById('analyze-btn').disabled = loading || review.value.trim() === '';
  document.getElementById('clear-btn').disabled = loading;
  document.getElementById('analyze-btn').textContent = loading ? 'Analyzing…' : 'Analyze';
  document.querySelectorAll('#samples button').forEach(b => b.disabled = loading);
}

function renderAnalyzer(a) {
  review.value = a.text;
  const overlay = document.getElementById('overlay');
  if (a.result) {
    const s = document.getElementById('result-sentiment');
    s.textContent = a.result.sentiment;
    s.className = 'sentiment ' + category(a.result.sentiment);
    document.getElementById('result-confidence').textContent = a.result.confidence_pct;
    overlay.classList.add('show');
  } else {
    overlay.classList.remove('show');
  }
  updateControls();
}

function category(label) {
  return label === 'Positive' || label === 'Negative' ? label : 'Neutral';
}

function renderSamples(samples) {
  document.getElementById('samples').innerHTML = samples
    .map((s, i) => `<button data-index="${i}" title="${esc(s)}">Sample ${i + 1}</button>`)
    .join('');
}

async function analyze() {
  if (loading) return;
  loading = true;
  updateControls();
  try {
    const { status, data } = await api('POST', '/api/analyze', { text: review.value });
    if (status === 200) {
      renderAnalyzer({ text: review.value, result: data.result });
      renderDashboard(data.dashboard);
    } else if (data.notice) {
      toast(data.notice.title, data.notice.message, true);
    } else {
      toast('Analysis Failed', data.error || 'Unexpected response', true);
    }
  } catch (e) {
    toast('Analysis Failed', 'An unexpected error occurred. Please check your connection or try again later.', true);
  } finally {
    loading = false;
    updateControls();
  }
}

async function clearInput() {
  const { data } = await api('POST', '/api/clear');
  renderAnalyzer(data.analyzer);
}

async function pickSample(index) {
  const { status, data } = await api('POST', '/api/sample', { index });
  if (status === 200) renderAnalyzer(data.analyzer);
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------
function renderDashboard(d) {
  document.getElementById('stat-total').textContent = d.total.toLocaleString();
  document.getElementById('stat-avg').textContent = d.avg_confidence_pct;

  const ratio = document.getElementById('ratio');
  if (!d.has_data) {
    ratio.innerHTML = '<div class="empty">No data to display</div>';
  } else {
    let at = 0;
    const stops = d.breakdown.map(b => {
      const from = at;
      at += b.share * 100;
      return `${COLORS[b.name]} ${from}% ${at}%`;
    });
    const legend = d.breakdown
      .map(b => `<li><span class="dot" style="background:${COLORS[b.name]}"></span>${b.name}: ${b.value} (${(b.share * 100).toFixed(0)}%)</li>`)
      .join('');
    ratio.innerHTML = `<div class="donut-wrap">
      <div class="donut" style="background:conic-gradient(${stops.join(', ')})"></div>
      <ul class="legend">${legend}</ul></div>`;
  }

  const history = document.getElementById('history');
  if (d.recent.length === 0) {
    history.innerHTML = '<li class="empty">No analyses yet.</li>';
  } else {
    history.innerHTML = d.recent
      .map(r => `<li><span class="text" title="${esc(r.text)}">${esc(r.text)}</span>
        <span class="tag ${r.category}">${esc(r.sentiment)} ${r.confidence_pct}</span></li>`)
      .join('');
  }
}

async function loadHealth() {
  const badge = document.getElementById('health-badge');
  try {
    const { data } = await api('GET', '/api/health');
    badge.textContent = data.endpoint_healthy ? 'endpoint online' : 'endpoint unreachable';
    badge.className = 'badge ' + (data.endpoint_healthy ? 'ok' : 'err');
  } catch (e) {
    badge.textContent = 'server offline';
    badge.className = 'badge err';
  }
}

// ---------------------------------------------------------------------------
// Wiring
// ---------------------------------------------------------------------------
review.addEventListener('input', updateControls);
document.getElementById('analyze-btn').addEventListener('click', analyze);
document.getElementById('clear-btn').addEventListener('click', clearInput);
document.getElementById('again-btn').addEventListener('click', clearInput);
document.getElementById('samples').addEventListener('click', e => {
  const index = e.target.dataset && e.target.dataset.index;
  if (index !== undefined && !loading) pickSample(Number(index));
});

(async function init() {
  try {
    const { data } = await api('GET', '/api/state');
    renderSamples(data.samples);
    renderAnalyzer(data.analyzer);
    renderDashboard(data.dashboard);
  } catch (e) {
    toast('Failed to load', e.message, true);
  }
  loadHealth();
})();
</script>
</body>
</html>
"##;
