//! Built-in example scripts, one per language/visualization pair.

use crate::client::{Language, VisualizationKind};

const PYTHON_STATIC: &str = r#"import matplotlib.pyplot as plt
import numpy as np

x = np.linspace(0, 10, 100)
y = np.sin(x)

plt.figure(figsize=(8, 6))
plt.plot(x, y, color='blue', linewidth=2)
plt.title('Sine Wave')
plt.xlabel('x')
plt.ylabel('sin(x)')
plt.grid(True, alpha=0.3)
plt.axhline(y=0, color='k', linestyle='-', alpha=0.3)

# Save the plot - the backend handles the output path
plt.savefig('output.png')
"#;

const PYTHON_INTERACTIVE: &str = r#"import plotly.graph_objects as go
import numpy as np

np.random.seed(42)
months = ['Jan', 'Feb', 'Mar', 'Apr', 'May', 'Jun',
          'Jul', 'Aug', 'Sep', 'Oct', 'Nov', 'Dec']
temperatures = np.random.normal(20, 5, 12)

fig = go.Figure()
fig.add_trace(go.Scatter(
    x=months,
    y=temperatures,
    name="Temperature (C)",
    line=dict(color="red", width=3),
))
fig.update_layout(title="Monthly Temperatures", hovermode="x unified")

fig.write_html('output.html')
"#;

const R_STATIC: &str = r#"library(ggplot2)

x <- seq(0, 10, length.out = 100)
df <- data.frame(x = x, y = sin(x))

p <- ggplot(df, aes(x = x, y = y)) +
  geom_line(color = "blue", linewidth = 1) +
  geom_hline(yintercept = 0, alpha = 0.3) +
  labs(title = "Sine Wave", x = "x", y = "sin(x)") +
  theme_minimal()

# Save the plot - the backend handles the output path
ggsave("output.png", p, width = 8, height = 6)
"#;

const R_INTERACTIVE: &str = r#"library(plotly)
library(htmlwidgets)

x <- seq(0, 10, length.out = 100)
fig <- plot_ly(x = x, y = sin(x), type = "scatter", mode = "lines",
               line = list(color = "blue", width = 3))
fig <- layout(fig, title = "Sine Wave", hovermode = "x unified")

saveWidget(fig, "output.html")
"#;

/// Example script for the given selector pair; used to prefill the editor.
pub fn example_code(language: Language, kind: VisualizationKind) -> &'static str {
    match (language, kind) {
        (Language::Python, VisualizationKind::Static) => PYTHON_STATIC,
        (Language::Python, VisualizationKind::Interactive) => PYTHON_INTERACTIVE,
        (Language::R, VisualizationKind::Static) => R_STATIC,
        (Language::R, VisualizationKind::Interactive) => R_INTERACTIVE,
    }
}
