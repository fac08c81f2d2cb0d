//! Fixed default template for new sessions

use crate::types::project::ProjectFile;

/// Path a fresh session starts on, and the fallback when a session's file
/// mapping becomes empty
pub const DEFAULT_ACTIVE_PATH: &str = "/App.js";

const APP_JS: &str = r#"export default function App() {
  return (
    <div className="app">
      <h1>Hello Canvas!</h1>
      <p>Start building your React app here.</p>
    </div>
  );
}
"#;

const INDEX_JS: &str = r#"import { StrictMode } from "react";
import { createRoot } from "react-dom/client";
import App from "./App";

const root = createRoot(document.getElementById("root"));
root.render(
  <StrictMode>
    <App />
  </StrictMode>
);
"#;

const STYLES_CSS: &str = r#".app {
  font-family: sans-serif;
  text-align: center;
  padding: 2rem;
}

h1 {
  color: #0ea5e9;
}
"#;

/// The file set a new session starts from
pub fn default_files() -> Vec<ProjectFile> {
    vec![
        ProjectFile::new("/App.js", APP_JS),
        ProjectFile::new("/index.js", INDEX_JS),
        ProjectFile::new("/styles.css", STYLES_CSS),
    ]
}
