pub async fn index() -> axum::response::Html<&'static str> {
    axum::response::Html(
        r#"
<!doctype html>
<html lang="pt-BR">
<head>
  <meta charset="utf-8"/>
  <meta name="viewport" content="width=device-width, initial-scale=1"/>
  <title>AppD Checklist</title>
  <style>
    :root {
      --bg: #0b1220;
      --card: #131d33;
      --line: #263551;
      --text: #e5ecff;
      --muted: #9eb0d6;
      --accent: #5cc8ff;
      --ok: #41d38a;
      --warn: #f7b955;
      --bad: #ff6b6b;
    }
    * { box-sizing: border-box; }
    body {
      margin: 0;
      font-family: Inter, Segoe UI, Roboto, sans-serif;
      background: radial-gradient(circle at 15% -10%, #1f3566, var(--bg));
      color: var(--text);
    }
    .container { max-width: 1200px; margin: 0 auto; padding: 24px; }
    .header { display: flex; justify-content: space-between; align-items: center; gap: 16px; }
    .title { margin: 0; font-size: 1.9rem; }
    .subtitle { margin: 8px 0 0; color: var(--muted); }
    .badge { padding: 6px 10px; border-radius: 999px; border: 1px solid var(--line); background: #0f1729; }
    .tabs { display: flex; gap: 8px; margin-top: 16px; }
    .tabs button { width: auto; }
    .tabs button.active { background: linear-gradient(90deg, #1b7cff, #2ca0ff); }
    .card {
      background: color-mix(in oklab, var(--card) 94%, black);
      border: 1px solid var(--line);
      border-radius: 14px;
      padding: 16px;
      box-shadow: 0 10px 35px rgba(0,0,0,.18);
      margin-top: 16px;
    }
    .row { display: grid; grid-template-columns: 340px 1fr; gap: 16px; }
    label { display: block; margin: 10px 0 6px; color: var(--muted); font-size: .9rem; }
    input, select, button {
      width: 100%; border-radius: 10px; border: 1px solid var(--line); background: #0d1629;
      color: var(--text); padding: 10px 12px;
    }
    button { background: linear-gradient(90deg, #1b7cff, #2ca0ff); border: none; font-weight: 600; cursor: pointer; }
    button.secondary { background: #1b2740; border: 1px solid var(--line); }
    button:disabled { opacity: .5; cursor: not-allowed; }
    .status { margin-top: 10px; color: var(--muted); font-size: .9rem; min-height: 22px; }
    .status.error { color: var(--bad); }
    table { width: 100%; border-collapse: collapse; font-size: .9rem; }
    th, td { padding: 8px 10px; border-bottom: 1px solid var(--line); text-align: left; }
    th { color: var(--muted); font-weight: 600; }
    td.actions { display: flex; gap: 6px; }
    td.actions button { width: auto; padding: 6px 10px; }
    .pill { border-radius: 999px; padding: 2px 9px; font-size: .78rem; border: 1px solid var(--line); color: var(--ok); }
    pre.report { white-space: pre-wrap; font-family: inherit; line-height: 1.5; background: #0d1629; padding: 16px; border-radius: 10px; min-height: 120px; }
    .hidden { display: none; }
    @media (max-width: 980px) { .row { grid-template-columns: 1fr; } }
  </style>
</head>
<body>
  <main class="container">
    <header class="header card">
      <div>
        <h1 class="title">AppD Checklist</h1>
        <p class="subtitle">Checklist diário de saúde AppDynamics (últimas 24h), pronto para o Teams.</p>
      </div>
      <span class="badge" id="clientBadge">nenhum cliente</span>
    </header>

    <nav class="tabs">
      <button class="secondary active" data-tab="dashboard">Dashboard</button>
      <button class="secondary" data-tab="clients">Clientes</button>
      <button class="secondary" data-tab="report">Relatório</button>
    </nav>

    <section id="tab-dashboard" class="card">
      <h3>Gerar checklist</h3>
      <label>Cliente</label><select id="clientSelect"></select>
      <div class="status" id="noClients">Nenhum cliente cadastrado. Vá em "Clientes".</div>
      <button id="generateBtn" style="margin-top:8px">Gerar Checklist Agora</button>
      <div class="status" id="status"></div>
    </section>

    <section id="tab-clients" class="row hidden">
      <aside class="card">
        <h3 id="formTitle">Novo cliente</h3>
        <label>Nome do Cliente</label><input id="f-name" placeholder="Ex: Banco XPTO"/>
        <label>Controller URL</label><input id="f-controllerUrl" placeholder="https://..."/>
        <label>Account Name</label><input id="f-accountName"/>
        <label>API Client Name</label><input id="f-clientName" placeholder="nome@conta"/>
        <label>API Client Secret</label><input id="f-clientSecret" type="password"/>
        <label>Teams Webhook</label><input id="f-teamsWebhookUrl" placeholder="https://outlook..."/>
        <button id="saveBtn" style="margin-top:12px">Salvar Cliente</button>
        <button class="secondary hidden" id="cancelBtn" style="margin-top:8px">Cancelar Edição</button>
      </aside>
      <article class="card">
        <h3>Clientes cadastrados</h3>
        <table><thead><tr><th>Nome</th><th>Controller</th><th></th></tr></thead><tbody id="clientsBody"></tbody></table>
      </article>
    </section>

    <section id="tab-report" class="card hidden">
      <h3>Relatório</h3>
      <div class="status" id="reportState">Nenhum relatório gerado ainda.</div>
      <pre class="report hidden" id="reportText"></pre>
      <div class="row hidden" id="reportActions" style="grid-template-columns: 1fr 1fr">
        <button class="secondary" id="copyBtn">Copiar</button>
        <button id="teamsBtn">Enviar para o Teams</button>
      </div>
      <div class="status" id="teamsStatus"></div>
    </section>
  </main>

<script>
const STORAGE_KEY = 'appd_automator_clients';
const FIELDS = ['name', 'controllerUrl', 'accountName', 'clientName', 'clientSecret', 'teamsWebhookUrl'];

let clients = JSON.parse(localStorage.getItem(STORAGE_KEY) || '[]');
let selectedId = clients.length > 0 ? clients[0].id : '';
let editingId = null;
let report = '';
let busy = false;

const $ = (id) => document.getElementById(id);
const esc = (s) => String(s ?? '').replace(/[&<>"']/g, (c) => ({'&':'&amp;','<':'&lt;','>':'&gt;','"':'&quot;',"'":'&#39;'}[c]));
const active = () => clients.find((c) => c.id === selectedId);
const persist = () => localStorage.setItem(STORAGE_KEY, JSON.stringify(clients));

const post = async (url, body) => {
  const resp = await fetch(url, { method: 'POST', headers: { 'Content-Type': 'application/json' }, body: JSON.stringify(body) });
  const data = await resp.json().catch(() => ({ error: `Servidor retornou ${resp.status}` }));
  if (!resp.ok || data.error) throw new Error(data.error || `Servidor retornou ${resp.status}`);
  return data;
};

function showTab(name) {
  document.querySelectorAll('.tabs button').forEach((b) => b.classList.toggle('active', b.dataset.tab === name));
  ['dashboard', 'clients', 'report'].forEach((t) => $(`tab-${t}`).classList.toggle('hidden', t !== name));
}

function render() {
  $('clientSelect').innerHTML = '<option value="" disabled>Selecione um cliente...</option>' +
    clients.map((c) => `<option value="${esc(c.id)}">${esc(c.name)}</option>`).join('');
  $('clientSelect').value = selectedId;
  $('noClients').classList.toggle('hidden', clients.length > 0);
  $('generateBtn').disabled = busy || !selectedId;
  $('generateBtn').textContent = busy ? 'Processando...' : 'Gerar Checklist Agora';
  $('clientBadge').textContent = active() ? active().name : 'nenhum cliente';

  $('clientsBody').innerHTML = clients.map((c) => `<tr>
      <td>${esc(c.name)} ${c.id === selectedId ? '<span class="pill">ativo</span>' : ''}</td>
      <td>${esc(c.controllerUrl)}</td>
      <td class="actions">
        <button class="secondary" data-select="${esc(c.id)}">Selecionar</button>
        <button class="secondary" data-edit="${esc(c.id)}">Editar</button>
        <button class="secondary" data-delete="${esc(c.id)}">Excluir</button>
      </td></tr>`).join('') || '<tr><td colspan="3">Nenhum cliente cadastrado</td></tr>';

  $('formTitle').textContent = editingId ? 'Editar cliente' : 'Novo cliente';
  $('saveBtn').textContent = editingId ? 'Atualizar Cliente' : 'Salvar Cliente';
  $('cancelBtn').classList.toggle('hidden', !editingId);
  $('teamsBtn').disabled = !(active() && active().teamsWebhookUrl);
}

function readForm() {
  return Object.fromEntries(FIELDS.map((f) => [f, $(`f-${f}`).value.trim()]));
}

function fillForm(client) {
  FIELDS.forEach((f) => { $(`f-${f}`).value = client ? (client[f] || '') : ''; });
}

$('saveBtn').onclick = () => {
  const form = readForm();
  if (!form.name || !form.controllerUrl) return;
  if (editingId) {
    clients = clients.map((c) => c.id === editingId ? { ...c, ...form } : c);
    editingId = null;
  } else {
    const client = { id: crypto.randomUUID(), ...form };
    clients.push(client);
    if (!selectedId) selectedId = client.id;
  }
  persist();
  fillForm(null);
  render();
};

$('cancelBtn').onclick = () => { editingId = null; fillForm(null); render(); };

$('clientsBody').onclick = (e) => {
  const { select, edit } = e.target.dataset;
  const del = e.target.dataset.delete;
  if (select) selectedId = select;
  if (edit) { editingId = edit; fillForm(clients.find((c) => c.id === edit)); }
  if (del) {
    clients = clients.filter((c) => c.id !== del);
    if (selectedId === del) selectedId = clients.length > 0 ? clients[0].id : '';
    if (editingId === del) { editingId = null; fillForm(null); }
    persist();
  }
  render();
};

$('clientSelect').onchange = (e) => { selectedId = e.target.value; render(); };

function setReportState(text, isError) {
  $('reportState').textContent = text;
  $('reportState').classList.toggle('error', !!isError);
  $('reportText').classList.toggle('hidden', !report);
  $('reportActions').classList.toggle('hidden', !report);
}

$('generateBtn').onclick = async () => {
  const client = active();
  if (!client) { $('status').textContent = 'Selecione ou configure um cliente primeiro.'; return; }
  busy = true;
  report = '';
  $('teamsStatus').textContent = '';
  $('status').classList.remove('error');
  $('status').textContent = 'Coletando dados do AppDynamics...';
  setReportState('Processando...');
  render();
  try {
    const data = await post('/api/appdynamics-data', {
      controllerUrl: client.controllerUrl,
      accountName: client.accountName,
      clientName: client.clientName,
      clientSecret: client.clientSecret,
    });
    $('status').textContent = 'Gerando checklist...';
    const generated = await post('/api/report', { clientName: client.name, data });
    report = generated.report;
    $('reportText').textContent = report;
    $('status').textContent = `Checklist gerado às ${new Date().toLocaleTimeString()}`;
    setReportState('Mensagem formatada: somente itens Warning/Critical, ambientes HML ignorados.');
    showTab('report');
  } catch (e) {
    $('status').classList.add('error');
    $('status').textContent = `Erro: ${e.message} (clique novamente para tentar de novo)`;
    setReportState(`Erro: ${e.message}`, true);
  } finally {
    busy = false;
    render();
  }
};

$('copyBtn').onclick = async () => {
  await navigator.clipboard.writeText(report);
  $('teamsStatus').textContent = 'Copiado!';
};

$('teamsBtn').onclick = async () => {
  const client = active();
  if (!report || !client || !client.teamsWebhookUrl) return;
  $('teamsBtn').disabled = true;
  $('teamsStatus').textContent = 'Enviando...';
  try {
    await post('/api/send-teams', { message: report, webhookUrl: client.teamsWebhookUrl });
    $('teamsStatus').textContent = 'Enviado com sucesso';
  } catch (e) {
    $('teamsStatus').textContent = `Erro ao enviar para o Teams: ${e.message}`;
  } finally {
    render();
  }
};

document.querySelectorAll('.tabs button').forEach((b) => { b.onclick = () => showTab(b.dataset.tab); });
render();
</script>
</body>
</html>
"#,
    )
}
