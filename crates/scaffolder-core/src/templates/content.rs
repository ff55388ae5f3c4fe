//! Fixed file templates and placeholder rendering
//!
//! Placeholders are written `{{name}}`. Rendering is a single pass, so
//! substituted values are never re-scanned for tokens.

use crate::error::{Result, ScaffoldError};

/// Render `template`, replacing every `{{name}}` with its value from `vars`
///
/// `path` only labels the error when a token has no value.
pub(crate) fn render(path: &str, template: &str, vars: &[(&str, &str)]) -> Result<String> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            return Err(ScaffoldError::UnresolvedPlaceholder {
                path: path.to_string(),
                token: rest[start..].lines().next().unwrap_or_default().to_string(),
            });
        };

        let name = after[..end].trim();
        match vars.iter().find(|(key, _)| *key == name) {
            Some((_, value)) => out.push_str(value),
            None => {
                return Err(ScaffoldError::UnresolvedPlaceholder {
                    path: path.to_string(),
                    token: format!("{{{{{name}}}}}"),
                })
            }
        }
        rest = &after[end + 2..];
    }

    out.push_str(rest);
    Ok(out)
}

/// Quote a value so dotenv reads it back unchanged
///
/// dotenv strips one pair of matching quotes and expands `\n` and `\r` only
/// inside double quotes. It has no other escapes, so values that double
/// quotes would alter go in single quotes or backticks instead. Carriage
/// returns never survive its line normalization.
pub(crate) fn dotenv_quote(field: &'static str, value: &str) -> Result<String> {
    if value.contains('\r') {
        return Err(ScaffoldError::validation(
            field,
            "cannot contain a carriage return in .env",
        ));
    }
    if !value.contains(['"', '\\', '\n']) {
        return Ok(format!("\"{value}\""));
    }
    match ['\'', '`'].into_iter().find(|quote| !value.contains(*quote)) {
        Some(quote) => Ok(format!("{quote}{value}{quote}")),
        None => Err(ScaffoldError::validation(
            field,
            "cannot contain both ' and ` together with \" or \\ in .env",
        )),
    }
}

pub(crate) const ENTRY_POINT: &str = r#"const express = require('express');
const mongoose = require('mongoose');
const cors = require('cors');
const helmet = require('helmet');
require('dotenv').config();

const routes = require('./src/routes');

const app = express();
const port = process.env.PORT || {{port}};

app.use(helmet());
app.use(cors());
app.use(express.json());
app.use(express.urlencoded({ extended: true }));

app.use('/api', routes);

mongoose
  .connect(process.env.MONGODB_URL)
  .then(() => {
    console.log('Connected to MongoDB');
    app.listen(port, () => {
      console.log(`Server is running on port ${port}`);
    });
  })
  .catch((err) => {
    console.error('Failed to connect to MongoDB', err);
    process.exit(1);
  });
"#;

pub(crate) const DOTENV: &str = "PORT={{port}}\nMONGODB_URL={{database_url}}";

pub(crate) const DOTENV_AUTH: &str = "\nJWT_SECRET={{jwt_secret}}\nJWT_EXPIRES_IN={{jwt_expires_in}}";

pub(crate) const DOTENV_EXAMPLE: &str = r#"# Port the HTTP server listens on
PORT={{port}}

# MongoDB connection string
# Replace the database name with your own
MONGODB_URL="mongodb://localhost:27017/{{database_name}}"
"#;

pub(crate) const DOTENV_EXAMPLE_AUTH: &str = r#"
# JWT secret key
# Replace with a strong, random secret and never commit the real value
JWT_SECRET="yourSecretKey"

# JWT token lifetime
# Examples: '1h' for 1 hour, '7d' for 7 days, '30m' for 30 minutes
JWT_EXPIRES_IN={{jwt_expires_in}}
"#;

pub(crate) const ROUTES_INDEX: &str = r#"const express = require('express');

const router = express.Router();

router.get('/', (req, res) => {
  res.send('Welcome to the API');
});

module.exports = router;
"#;

pub(crate) const ROUTES_INDEX_AUTH: &str = r#"const express = require('express');
const authRoutes = require('./authRoutes');
const { verifyToken } = require('../utils/jwt');

const router = express.Router();

router.get('/', (req, res) => {
  res.send('Welcome to the API');
});

router.use('/auth', authRoutes);

router.get('/protected', verifyToken, (req, res) => {
  res.send(`Hello ${req.user.username}, you have access to this protected route.`);
});

module.exports = router;
"#;

pub(crate) const AUTH_ROUTES: &str = r#"const express = require('express');
const User = require('../models/model');
const { generateToken } = require('../utils/jwt');

const router = express.Router();

router.post('/register', async (req, res) => {
  const { username, email, password } = req.body;
  if (!username || !email || !password) {
    return res.status(400).json({ message: 'username, email and password are required' });
  }

  try {
    const existing = await User.findOne({ email });
    if (existing) {
      return res.status(409).json({ message: 'Email already registered' });
    }

    const user = await User.create({ username, email, password });
    return res.status(201).json({ token: generateToken(user) });
  } catch (err) {
    if (err.code === 11000) {
      return res.status(409).json({ message: 'Username or email already registered' });
    }
    return res.status(500).json({ message: 'Registration failed' });
  }
});

router.post('/login', async (req, res) => {
  const { email, password } = req.body;

  try {
    const user = await User.findOne({ email });
    if (!user || !(await user.comparePassword(password || ''))) {
      return res.status(401).json({ message: 'Invalid email or password' });
    }

    return res.json({ token: generateToken(user) });
  } catch (err) {
    return res.status(500).json({ message: 'Login failed' });
  }
});

module.exports = router;
"#;

pub(crate) const USER_MODEL: &str = r#"const mongoose = require('mongoose');
const bcrypt = require('bcryptjs');

const UserSchema = new mongoose.Schema(
  {
    username: { type: String, required: true, unique: true, trim: true },
    email: { type: String, required: true, unique: true, lowercase: true, trim: true },
    password: { type: String, required: true },
  },
  { timestamps: true }
);

// Hash the password whenever it was set or changed
UserSchema.pre('save', async function hashPassword() {
  if (!this.isModified('password')) return;

  const salt = await bcrypt.genSalt(10);
  this.password = await bcrypt.hash(this.password, salt);
});

UserSchema.methods.comparePassword = function comparePassword(candidate) {
  return bcrypt.compare(candidate, this.password);
};

module.exports = mongoose.model('User', UserSchema);
"#;

pub(crate) const JWT_UTILS: &str = r#"const jwt = require('jsonwebtoken');

const generateToken = (user) =>
  jwt.sign({ id: user.id, username: user.username }, process.env.JWT_SECRET, {
    expiresIn: process.env.JWT_EXPIRES_IN,
  });

const verifyToken = (req, res, next) => {
  const header = req.headers.authorization;
  if (!header) {
    return res.status(401).json({ message: 'No token provided' });
  }

  const [scheme, token] = header.split(' ');
  if (scheme !== 'Bearer' || !token) {
    return res.status(401).json({ message: 'Malformed authorization header' });
  }

  try {
    const decoded = jwt.verify(token, process.env.JWT_SECRET);
    req.user = { id: decoded.id, username: decoded.username };
    return next();
  } catch (err) {
    if (err.name === 'TokenExpiredError') {
      return res.status(401).json({ message: 'Token expired' });
    }
    return res.status(401).json({ message: 'Invalid token' });
  }
};

module.exports = { generateToken, verifyToken };
"#;

pub(crate) const GITIGNORE: &str = r#"node_modules/
.env
npm-debug.log*
yarn-error.log*
logs/
coverage/
.DS_Store
"#;

pub(crate) const README: &str = r#"# {{project_name}}

Express and MongoDB backend service.

## Getting started

With npm:

```sh
npm install
npm run dev
```

With pnpm, yarn or bun, run `<pm> install` and then `<pm> dev`.

The server listens on port {{port}} and connects to `{{database_url}}` by default.
Both can be changed in `.env` (see `.env.example`).

## Environment

| Variable | Purpose |
| --- | --- |
| `PORT` | HTTP port |
| `MONGODB_URL` | MongoDB connection string |
{{env_rows}}
## Endpoints

| Method | Path | Description |
| --- | --- | --- |
| GET | `/api` | Welcome message |
{{endpoint_rows}}
## Layout

- `index.js` - entry point
- `src/routes` - route definitions
- `src/controllers` - request handlers
- `src/models` - data models
- `src/services` - business logic
- `src/utils` - shared utilities
- `src/middleware` - cross-cutting middleware
- `tests` - tests
"#;

pub(crate) const README_AUTH_ENV_ROWS: &str = "| `JWT_SECRET` | Secret used to sign tokens |
| `JWT_EXPIRES_IN` | Token lifetime, e.g. `1h` |
";

pub(crate) const README_AUTH_ENDPOINT_ROWS: &str = "| POST | `/api/auth/register` | Create an account and receive a token |
| POST | `/api/auth/login` | Exchange credentials for a token |
| GET | `/api/protected` | Example route requiring `Authorization: Bearer <token>` |
";

pub(crate) const README_REPOSITORY: &str = r#"
## Repository

{{repository_url}}
"#;
