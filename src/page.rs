// src/page.rs

//! The embedded browser front end.
//!
//! The server does not render templates or serve assets from disk.
//! It ships exactly one self-contained page: markup, styles, and the
//! driving script in a single response, no build step, no CDN.
//!
//! Responsibilities of the page:
//! - Collect prompt, language, and the simple-mode toggle
//! - POST /api/generate and seed the editable code panel
//! - POST /api/execute for verify (empty stdin) and run (user stdin)
//! - Show `{message}`, stderr, and stdout exactly as reported
//! - Disable the action buttons while a request is outstanding

/// The whole front end, served at `/`.
pub fn index_html() -> &'static str {
    r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>promptrun</title>
<style>
  body { font-family: system-ui, sans-serif; max-width: 880px; margin: 2rem auto; padding: 0 1rem; color: #1f2430; }
  h1 { margin-bottom: 0; }
  .sub { color: #667; margin-top: 0.25rem; }
  .panel { border: 1px solid #d5d9e0; border-radius: 8px; padding: 1rem; margin-top: 1rem; }
  label { font-weight: 600; display: block; margin-bottom: 0.4rem; }
  input[type=text], textarea { width: 100%; box-sizing: border-box; font-family: inherit; padding: 0.5rem; border: 1px solid #c6ccd6; border-radius: 6px; }
  textarea.code { font-family: ui-monospace, monospace; min-height: 14rem; }
  textarea.stdin { font-family: ui-monospace, monospace; min-height: 4rem; }
  .langs button { margin-right: 0.4rem; padding: 0.35rem 0.8rem; border: 1px solid #c6ccd6; border-radius: 6px; background: #fff; cursor: pointer; }
  .langs button.active { background: #2458d6; color: #fff; border-color: #2458d6; }
  .actions { margin-top: 0.8rem; }
  .actions button { margin-right: 0.5rem; padding: 0.45rem 1.1rem; border: none; border-radius: 6px; background: #2458d6; color: #fff; cursor: pointer; }
  .actions button:disabled { background: #9aa6bd; cursor: wait; }
  .error { color: #b3261e; margin-top: 0.6rem; white-space: pre-wrap; }
  pre.terminal { background: #0b0e14; color: #c6e2c8; padding: 0.8rem; border-radius: 6px; min-height: 6rem; white-space: pre-wrap; }
  .row { display: flex; gap: 0.8rem; align-items: center; margin-top: 0.8rem; }
</style>
</head>
<body>
<h1>promptrun</h1>
<p class="sub">prompt in, code out, runs remotely</p>

<div class="panel">
  <label for="prompt">Prompt</label>
  <input id="prompt" type="text" placeholder="e.g. read two numbers and print their sum">

  <div class="row">
    <span class="langs" id="langs">
      <button data-lang="C">C</button>
      <button data-lang="C++">C++</button>
      <button data-lang="Java">Java</button>
      <button data-lang="JavaScript">JavaScript</button>
      <button data-lang="Python" class="active">Python</button>
    </span>
    <label style="font-weight: 400; margin: 0;">
      <input id="simple" type="checkbox"> simple mode
    </label>
  </div>

  <div class="actions">
    <button id="generate">Generate</button>
    <button id="copy">Copy</button>
  </div>
  <div class="error" id="generr"></div>
</div>

<div class="panel">
  <label for="code">Code (editable)</label>
  <textarea id="code" class="code" spellcheck="false"></textarea>

  <label for="stdin" style="margin-top: 0.8rem;">Program input (stdin)</label>
  <textarea id="stdin" class="stdin" spellcheck="false"></textarea>

  <div class="actions">
    <button id="verify">Verify</button>
    <button id="run">Run</button>
  </div>
  <pre class="terminal" id="out">// Click 'Run' to execute code...</pre>
</div>

<script>
  'use strict';

  var language = 'Python';
  var busy = false;

  function el(id) { return document.getElementById(id); }

  function setBusy(value) {
    busy = value;
    ['generate', 'copy', 'verify', 'run'].forEach(function (id) {
      el(id).disabled = value;
    });
  }

  el('langs').addEventListener('click', function (e) {
    var button = e.target.closest('button');
    if (!button || busy) return;
    language = button.dataset.lang;
    el('langs').querySelectorAll('button').forEach(function (b) {
      b.classList.toggle('active', b === button);
    });
  });

  async function generate() {
    el('generr').textContent = '';

    var prompt = el('prompt').value;
    if (!prompt.trim()) {
      el('generr').textContent = 'Please enter a prompt';
      return;
    }

    setBusy(true);
    try {
      var response = await fetch('/api/generate', {
        method: 'POST',
        headers: { 'Content-Type': 'application/json' },
        body: JSON.stringify({
          prompt: prompt.trim(),
          language: language,
          simpleMode: el('simple').checked
        })
      });
      var data = await response.json();

      if (!response.ok) {
        el('generr').textContent = data.error || 'Failed to generate code';
        return;
      }
      el('code').value = data.code;
    } catch (err) {
      el('generr').textContent = 'Network error. Please try again.';
    } finally {
      setBusy(false);
    }
  }

  async function execute(stdin) {
    setBusy(true);
    el('out').textContent = 'Executing...';
    try {
      var response = await fetch('/api/execute', {
        method: 'POST',
        headers: { 'Content-Type': 'application/json' },
        body: JSON.stringify({
          code: el('code').value,
          language: language,
          stdin: stdin
        })
      });
      var data = await response.json();

      if (data.message) {
        el('out').textContent = 'Error: ' + data.message;
      } else if (data.error) {
        el('out').textContent = 'Error: ' + data.error;
      } else if (data.run.stderr) {
        el('out').textContent = 'Execution Error:\n' + data.run.stderr;
      } else {
        el('out').textContent = '> Output:\n' + data.run.stdout;
      }
    } catch (err) {
      el('out').textContent = 'Error connecting to execution server.';
    } finally {
      setBusy(false);
    }
  }

  el('generate').addEventListener('click', generate);
  el('prompt').addEventListener('keypress', function (e) {
    if (e.key === 'Enter' && !busy) generate();
  });

  el('copy').addEventListener('click', async function () {
    try {
      await navigator.clipboard.writeText(el('code').value);
      el('copy').textContent = 'Copied!';
      setTimeout(function () { el('copy').textContent = 'Copy'; }, 2000);
    } catch (err) {
      el('generr').textContent = 'Failed to copy';
    }
  });

  el('verify').addEventListener('click', function () { execute(''); });
  el('run').addEventListener('click', function () { execute(el('stdin').value); });
</script>
</body>
</html>
"#
}
