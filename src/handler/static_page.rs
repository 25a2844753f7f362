//! Static landing page served on `/` and `/index.html`

pub const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="vi">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>AI Chat Interface</title>
    <style>
        body {
            font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif;
            background: linear-gradient(135deg, #667eea 0%, #764ba2 100%);
            min-height: 100vh;
            margin: 0;
            display: flex;
            align-items: center;
            justify-content: center;
        }
        main {
            background: #fff;
            border-radius: 16px;
            padding: 32px;
            max-width: 720px;
            width: 100%;
            box-shadow: 0 20px 40px rgba(0, 0, 0, 0.1);
        }
        h1 { margin-top: 0; color: #333; }
        input, select, button { font-size: 16px; padding: 12px; border-radius: 8px; }
        input, select { width: 100%; box-sizing: border-box; border: 2px solid #e1e5e9; margin-bottom: 12px; }
        button { background: #667eea; color: #fff; border: none; cursor: pointer; width: 100%; }
        button:disabled { background: #ccc; cursor: not-allowed; }
        #response { margin-top: 20px; padding: 16px; background: #f8f9fa; border-left: 4px solid #667eea; white-space: pre-wrap; min-height: 60px; }
        .endpoints { margin-top: 20px; font-size: 0.9em; color: #1565c0; }
    </style>
</head>
<body>
<main>
    <h1>AI Chat Interface</h1>
    <select id="model">
        <option value="gpt-5-nano">GPT-5 Nano</option>
        <option value="gpt-5-mini">GPT-5 Mini</option>
        <option value="gpt-5">GPT-5</option>
        <option value="gpt-4o">GPT-4o</option>
        <option value="gpt-4o-mini">GPT-4o Mini</option>
    </select>
    <input id="message" type="text" placeholder="Hôm nay là thứ mấy?">
    <button id="send">Send Message</button>
    <div id="response"></div>
    <div class="endpoints">
        POST /api/chat &middot; POST /api/webhook
    </div>
</main>
<script src="https://js.puter.com/v2/"></script>
<script>
    const send = document.getElementById('send');
    const out = document.getElementById('response');

    async function chat() {
        const message = document.getElementById('message').value.trim();
        const model = document.getElementById('model').value;
        if (!message) {
            return;
        }
        send.disabled = true;
        out.textContent = '...';
        try {
            const res = await fetch('/api/chat', {
                method: 'POST',
                headers: { 'Content-Type': 'application/json' },
                body: JSON.stringify({ message, model })
            });
            const data = await res.json();
            out.textContent = data.message || data.error;
        } catch (err) {
            out.textContent = 'Error: ' + err.message;
        } finally {
            send.disabled = false;
        }
    }

    send.addEventListener('click', chat);
    document.getElementById('message').addEventListener('keypress', (e) => {
        if (e.key === 'Enter') {
            chat();
        }
    });
</script>
</body>
</html>
"#;
